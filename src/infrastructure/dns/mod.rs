//! DNS challenge checking.
//!
//! DNS is an external, non-deterministic dependency, so the checker sits
//! behind a capability trait: the daemon wires in the live
//! [`HickoryChecker`], tests inject the deterministic [`FakeChecker`].
//! The checker is a pure query; it never touches the record store.

pub mod fake;
mod hickory;

use std::net::Ipv4Addr;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Hostname, VerificationToken};

pub use fake::FakeChecker;
pub use hickory::HickoryChecker;

/// Result of one live challenge check.
///
/// "Record absent" is a normal answer, not an error: a domain that is
/// not configured yet simply reports `false`. Only resolver trouble
/// (timeouts, SERVFAIL) becomes [`DnsCheckError::Transient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeCheck {
    /// The TXT challenge record carried the expected token.
    pub txt_verified: bool,
    /// The hostname routes to the platform (A record on roots, CNAME on
    /// subdomains). Only meaningful when `txt_verified` is true;
    /// routing of an unproven domain is never evaluated.
    pub routing_ok: bool,
}

#[derive(Debug, Error)]
pub enum DnsCheckError {
    /// Timeout, SERVFAIL or comparable resolver failure. Retryable;
    /// surfaced to the user as "not verified yet", never as a fault.
    #[error("Transient DNS lookup failure: {0}")]
    Transient(String),
}

#[async_trait]
pub trait DnsChecker: Send + Sync {
    async fn check(
        &self,
        hostname: &Hostname,
        token: &VerificationToken,
    ) -> Result<ChallengeCheck, DnsCheckError>;
}

/// A TXT challenge passes iff any record's concatenated value equals
/// the token exactly. Case-sensitive: the token is ours, verbatim.
pub(crate) fn txt_matches(records: &[String], token: &VerificationToken) -> bool {
    records.iter().any(|r| r.trim() == token.as_str())
}

/// Root-domain routing: the platform edge IP must be among the A records.
pub(crate) fn a_routing_ok(addrs: &[Ipv4Addr], edge_ip: Ipv4Addr) -> bool {
    addrs.contains(&edge_ip)
}

/// Subdomain routing: some CNAME must equal the canonical platform
/// hostname or sit under it. Subdomains are accepted because the edge
/// hands out per-region hostnames beneath the canonical zone.
pub(crate) fn cname_routing_ok(targets: &[String], canonical_host: &str) -> bool {
    targets.iter().any(|t| {
        let target = t.trim_end_matches('.').to_lowercase();
        target == canonical_host || target.ends_with(&format!(".{}", canonical_host))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_match_is_exact_and_case_sensitive() {
        let token = VerificationToken::from_stored("linkhub-verify-abc");
        assert!(txt_matches(
            &["other".into(), "linkhub-verify-abc".into()],
            &token
        ));
        assert!(txt_matches(&["  linkhub-verify-abc  ".into()], &token));
        assert!(!txt_matches(&["linkhub-verify-ABC".into()], &token));
        assert!(!txt_matches(&[], &token));
    }

    #[test]
    fn a_routing_requires_edge_ip() {
        let edge = Ipv4Addr::new(76, 76, 21, 21);
        assert!(a_routing_ok(&[Ipv4Addr::new(1, 1, 1, 1), edge], edge));
        assert!(!a_routing_ok(&[Ipv4Addr::new(1, 1, 1, 1)], edge));
    }

    #[test]
    fn cname_routing_accepts_canonical_and_subdomains() {
        assert!(cname_routing_ok(
            &["edge.linkhub.com.".into()],
            "edge.linkhub.com"
        ));
        assert!(cname_routing_ok(
            &["EU.edge.linkhub.com".into()],
            "edge.linkhub.com"
        ));
        assert!(!cname_routing_ok(
            &["notedge.linkhub.com".into()],
            "edge.linkhub.com"
        ));
        assert!(!cname_routing_ok(
            &["edge.linkhub.com.evil.com".into()],
            "edge.linkhub.com"
        ));
    }
}
