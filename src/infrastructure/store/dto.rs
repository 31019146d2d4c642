//! Persistence DTOs for the domain-record store.
//!
//! Decouples the on-disk TOML layout from the domain entities so that
//! adding or removing entity fields doesn't silently change the store
//! file format, and deserialization can't bypass the invariants the
//! `Hostname` constructor enforces.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    DomainKind, DomainRecord, Hostname, HostnameError, PageId, UserId, VerificationStatus,
    VerificationToken,
};

/// One claimed hostname as stored on disk. The hostname itself is the
/// map key in [`StoreFile`], which makes uniqueness a structural
/// property of the file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDto {
    pub id: Uuid,
    pub owner: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageId>,
    pub kind: DomainKind,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<VerificationToken>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub verified_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_checked_at: Option<OffsetDateTime>,
}

impl RecordDto {
    pub fn from_record(record: &DomainRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner.clone(),
            page: record.page.clone(),
            kind: record.kind,
            status: record.status,
            token: record.token.clone(),
            verified_at: record.verified_at,
            last_checked_at: record.last_checked_at,
        }
    }

    pub fn into_record(self, hostname: &str) -> Result<DomainRecord, HostnameError> {
        Ok(DomainRecord {
            id: self.id,
            owner: self.owner,
            page: self.page,
            kind: self.kind,
            hostname: Hostname::from_stored(hostname.to_string())?,
            status: self.status,
            token: self.token,
            verified_at: self.verified_at,
            last_checked_at: self.last_checked_at,
        })
    }
}

/// A link page known to the page-store collaborator, mirrored here for
/// ownership checks and hostname routing. Page CRUD itself lives
/// elsewhere; this table is seeded by migration/import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto {
    pub owner: UserId,
}
