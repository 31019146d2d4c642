//! Import of the legacy per-page domain-mapping model.
//!
//! The platform used to attach domains to individual link pages, many
//! per page, in a `domain_mappings` table. That model is no longer
//! maintained; this module converts an exported legacy file into the
//! unified account-level records, so old claims survive the upgrade
//! without keeping two verification code paths alive.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    DomainKind, DomainRecord, Hostname, PageId, UserId, VerificationStatus, VerificationToken,
};

use super::{DomainStore, StoreError};

/// One row of the legacy `domain_mappings` export.
#[derive(Debug, Deserialize)]
pub struct LegacyMapping {
    pub link_page_id: String,
    pub domain_type: LegacyDomainType,
    pub hostname: String,
    #[serde(default = "default_status")]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub verification_token: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_checked_at: Option<OffsetDateTime>,
}

fn default_status() -> VerificationStatus {
    VerificationStatus::Pending
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyDomainType {
    Subdomain,
    Custom,
}

/// The legacy export file: page ownership plus the mapping rows.
#[derive(Debug, Deserialize)]
pub struct LegacyExport {
    /// `link_page_id -> owning user id`.
    pub pages: BTreeMap<String, String>,
    #[serde(default)]
    pub mappings: Vec<LegacyMapping>,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub imported: usize,
    pub skipped: Vec<(String, String)>,
}

impl MigrationReport {
    fn skip(&mut self, hostname: &str, reason: impl Into<String>) {
        self.skipped.push((hostname.to_string(), reason.into()));
    }
}

pub fn load_legacy_export(path: &Path) -> Result<LegacyExport, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Import legacy mappings into the unified store. Rows whose page has
/// no known owner, whose hostname fails today's validation, or whose
/// hostname is already held by a different tenant are skipped and
/// reported, never silently dropped.
pub fn import(store: &DomainStore, export: LegacyExport) -> Result<MigrationReport, StoreError> {
    let mut report = MigrationReport::default();

    for (page_id, owner) in &export.pages {
        store.upsert_page(PageId::new(page_id.clone()), UserId::new(owner.clone()))?;
    }

    for mapping in export.mappings {
        let Some(owner) = export.pages.get(&mapping.link_page_id) else {
            report.skip(&mapping.hostname, "page has no known owner");
            continue;
        };
        let owner = UserId::new(owner.clone());

        let hostname = match Hostname::from_stored(mapping.hostname.to_lowercase()) {
            Ok(h) => h,
            Err(e) => {
                report.skip(&mapping.hostname, format!("invalid hostname: {}", e));
                continue;
            }
        };

        if !store.is_available(&hostname, &owner) {
            report.skip(&mapping.hostname, "hostname already held by another tenant");
            continue;
        }

        let record = match mapping.domain_type {
            LegacyDomainType::Subdomain => DomainRecord::new_platform_subdomain(
                owner,
                PageId::new(mapping.link_page_id.clone()),
                hostname,
            ),
            LegacyDomainType::Custom => DomainRecord {
                id: Uuid::new_v4(),
                owner,
                page: Some(PageId::new(mapping.link_page_id.clone())),
                kind: DomainKind::Custom,
                hostname,
                // Verifying was a transient state; park it back at
                // pending so the re-check scheduler picks it up.
                status: match mapping.verification_status {
                    VerificationStatus::Verifying => VerificationStatus::Pending,
                    other => other,
                },
                token: mapping
                    .verification_token
                    .map(VerificationToken::from_stored)
                    .or_else(|| Some(VerificationToken::issue())),
                verified_at: match mapping.verification_status {
                    VerificationStatus::Verified => Some(OffsetDateTime::now_utc()),
                    _ => None,
                },
                last_checked_at: mapping.last_checked_at,
            },
        };

        match store.claim(record) {
            Ok(record) => {
                info!(hostname = %record.hostname, owner = %record.owner, "imported legacy mapping");
                report.imported += 1;
            }
            Err(StoreError::HostnameTaken(hostname)) => {
                warn!(hostname = %hostname, "legacy mapping lost the hostname to another tenant");
                report.skip(&hostname, "hostname already held by another tenant");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn legacy_toml(body: &str) -> LegacyExport {
        toml::from_str(body).unwrap()
    }

    #[test]
    fn imports_subdomain_and_custom_rows() {
        let dir = TempDir::new().unwrap();
        let store = DomainStore::open(dir.path().join("store.toml")).unwrap();

        let export = legacy_toml(
            r#"
            [pages]
            p1 = "u1"
            p2 = "u2"

            [[mappings]]
            link_page_id = "p1"
            domain_type = "subdomain"
            hostname = "alice.linkhub.com"

            [[mappings]]
            link_page_id = "p2"
            domain_type = "custom"
            hostname = "Band.example.com"
            verification_status = "pending"
            verification_token = "linkhub-verify-abc123"
            "#,
        );

        let report = import(&store, export).unwrap();
        assert_eq!(report.imported, 2);
        assert!(report.skipped.is_empty());

        let sub = store.find_by_hostname("alice.linkhub.com").unwrap().unwrap();
        assert!(sub.is_verified());
        assert_eq!(sub.kind, DomainKind::PlatformSubdomain);

        let custom = store.find_by_hostname("band.example.com").unwrap().unwrap();
        assert_eq!(custom.status, VerificationStatus::Pending);
        assert_eq!(custom.token.unwrap().as_str(), "linkhub-verify-abc123");
        assert_eq!(store.page_owner(&PageId::new("p1")), Some(UserId::new("u1")));
    }

    #[test]
    fn skips_orphans_and_collisions() {
        let dir = TempDir::new().unwrap();
        let store = DomainStore::open(dir.path().join("store.toml")).unwrap();

        store
            .claim(DomainRecord::new_custom(
                UserId::new("existing"),
                Hostname::from_stored("taken.com".to_string()).unwrap(),
                VerificationToken::issue(),
            ))
            .unwrap();

        let export = legacy_toml(
            r#"
            [pages]
            p1 = "u1"

            [[mappings]]
            link_page_id = "orphan-page"
            domain_type = "custom"
            hostname = "orphan.com"

            [[mappings]]
            link_page_id = "p1"
            domain_type = "custom"
            hostname = "taken.com"

            [[mappings]]
            link_page_id = "p1"
            domain_type = "custom"
            hostname = "not a hostname"
            "#,
        );

        let report = import(&store, export).unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped.len(), 3);
    }
}
