use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::value_objects::{Hostname, PageId, UserId, VerificationToken};

/// How a hostname entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// A free `<label>.<platform>` subdomain allocated by the platform
    /// itself, trusted without a DNS challenge.
    PlatformSubdomain,
    /// An externally registered domain the tenant must prove control of.
    Custom,
}

/// Lifecycle of the ownership proof.
///
/// `Pending -> Verifying -> {Verified | Failed}`, with `Failed ->
/// Verifying` allowed for retries. `Verified` is terminal except for
/// explicit removal or reconnect, which start over under a fresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verifying,
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// A hostname claimed by a tenant, together with its ownership proof.
///
/// One record type covers both free platform subdomains and customer
/// custom domains; `kind` decides the trust path.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    pub id: Uuid,
    pub owner: UserId,
    /// Routing target. `None` routes to the owner's default page.
    pub page: Option<PageId>,
    pub kind: DomainKind,
    pub hostname: Hostname,
    pub status: VerificationStatus,
    pub token: Option<VerificationToken>,
    pub verified_at: Option<OffsetDateTime>,
    pub last_checked_at: Option<OffsetDateTime>,
}

impl DomainRecord {
    /// A custom domain starts pending, carrying the freshly minted
    /// challenge token.
    pub fn new_custom(owner: UserId, hostname: Hostname, token: VerificationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            page: None,
            kind: DomainKind::Custom,
            hostname,
            status: VerificationStatus::Pending,
            token: Some(token),
            verified_at: None,
            last_checked_at: None,
        }
    }

    /// A platform subdomain is born verified: the platform allocated it,
    /// so there is nothing to challenge.
    pub fn new_platform_subdomain(owner: UserId, page: PageId, hostname: Hostname) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            page: Some(page),
            kind: DomainKind::PlatformSubdomain,
            hostname,
            status: VerificationStatus::Verified,
            token: None,
            verified_at: Some(OffsetDateTime::now_utc()),
            last_checked_at: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostname(s: &str) -> Hostname {
        Hostname::from_stored(s.to_string()).unwrap()
    }

    #[test]
    fn custom_records_start_pending_with_token() {
        let record = DomainRecord::new_custom(
            UserId::new("u1"),
            hostname("mysite.com"),
            VerificationToken::issue(),
        );
        assert_eq!(record.status, VerificationStatus::Pending);
        assert!(record.token.is_some());
        assert!(record.verified_at.is_none());
        assert!(!record.is_verified());
    }

    #[test]
    fn platform_subdomains_are_born_verified() {
        let record = DomainRecord::new_platform_subdomain(
            UserId::new("u1"),
            PageId::new("p1"),
            hostname("alice.linkhub.com"),
        );
        assert!(record.is_verified());
        assert!(record.verified_at.is_some());
        assert!(record.token.is_none());
    }

    #[test]
    fn only_verified_is_terminal() {
        assert!(VerificationStatus::Verified.is_terminal());
        for status in [
            VerificationStatus::Pending,
            VerificationStatus::Verifying,
            VerificationStatus::Failed,
        ] {
            assert!(!status.is_terminal());
        }
    }
}
