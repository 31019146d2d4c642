mod dto;
pub mod migration;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    DomainKind, DomainRecord, Hostname, PageId, UserId, VerificationStatus, VerificationToken,
};

pub use dto::{PageDto, RecordDto};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse store file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize store file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Hostname is already claimed by another tenant: {0}")]
    HostnameTaken(String),

    #[error("Store file contains an invalid hostname: {0}")]
    Corrupt(#[from] crate::domain::HostnameError),
}

/// On-disk layout: hostnames are map keys, so two records for the same
/// hostname cannot even be expressed in the file format.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct StoreFile {
    #[serde(default)]
    pub records: BTreeMap<String, RecordDto>,
    #[serde(default)]
    pub pages: BTreeMap<String, PageDto>,
}

/// The domain-record store: whole-file TOML persistence with the live
/// copy held in memory behind a mutex.
///
/// Every mutation runs as a single critical section, so the
/// availability check and the write that depends on it cannot be split
/// by a concurrent claimant. This is the one atomicity guarantee the
/// claim path needs.
pub struct DomainStore {
    path: PathBuf,
    inner: Mutex<StoreFile>,
}

impl DomainStore {
    /// Load the store from disk, or start empty if the file does not
    /// exist yet.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let file = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            StoreFile::default()
        };

        Ok(Self {
            path,
            inner: Mutex::new(file),
        })
    }

    fn persist(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// True iff no *other* tenant holds the hostname. A tenant
    /// re-submitting its own hostname is not told it is unavailable.
    pub fn is_available(&self, hostname: &Hostname, claimant: &UserId) -> bool {
        let file = self.inner.lock().expect("store mutex poisoned");
        match file.records.get(hostname.as_str()) {
            Some(existing) => &existing.owner == claimant,
            None => true,
        }
    }

    /// Check-and-insert in one critical section. For a custom-domain
    /// claim the owner's previous custom record is replaced in the same
    /// write, which is what resets verification on reconnect.
    pub fn claim(&self, record: DomainRecord) -> Result<DomainRecord, StoreError> {
        let mut file = self.inner.lock().expect("store mutex poisoned");

        if let Some(existing) = file.records.get(record.hostname.as_str()) {
            if existing.owner != record.owner {
                return Err(StoreError::HostnameTaken(record.hostname.to_string()));
            }
        }

        let mut next = file.clone();

        if record.kind == DomainKind::Custom {
            next.records.retain(|_, dto| {
                !(dto.owner == record.owner && dto.kind == DomainKind::Custom)
            });
        }

        next.records.insert(
            record.hostname.as_str().to_string(),
            RecordDto::from_record(&record),
        );

        self.persist(&next)?;
        *file = next;
        Ok(record)
    }

    pub fn find_by_hostname(&self, hostname: &str) -> Result<Option<DomainRecord>, StoreError> {
        let file = self.inner.lock().expect("store mutex poisoned");
        file.records
            .get(hostname)
            .map(|dto| dto.clone().into_record(hostname))
            .transpose()
            .map_err(StoreError::from)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<DomainRecord>, StoreError> {
        let file = self.inner.lock().expect("store mutex poisoned");
        for (hostname, dto) in &file.records {
            if dto.id == id {
                return Ok(Some(dto.clone().into_record(hostname)?));
            }
        }
        Ok(None)
    }

    /// The tenant's account-level custom domain, if any.
    pub fn find_custom_by_owner(&self, owner: &UserId) -> Result<Option<DomainRecord>, StoreError> {
        let file = self.inner.lock().expect("store mutex poisoned");
        for (hostname, dto) in &file.records {
            if &dto.owner == owner && dto.kind == DomainKind::Custom {
                return Ok(Some(dto.clone().into_record(hostname)?));
            }
        }
        Ok(None)
    }

    pub fn records_for_owner(&self, owner: &UserId) -> Result<Vec<DomainRecord>, StoreError> {
        let file = self.inner.lock().expect("store mutex poisoned");
        let mut out = Vec::new();
        for (hostname, dto) in &file.records {
            if &dto.owner == owner {
                out.push(dto.clone().into_record(hostname)?);
            }
        }
        Ok(out)
    }

    /// Apply a verification-status transition, guarded against races
    /// with removal or reconnect: if the record is gone, or its token no
    /// longer matches the one the in-flight check was issued for, the
    /// result is discarded and `None` is returned.
    ///
    /// Stamps `last_checked_at`, and `verified_at` on the transition to
    /// `Verified`.
    pub fn update_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
        expected_token: Option<&VerificationToken>,
    ) -> Result<Option<DomainRecord>, StoreError> {
        let mut file = self.inner.lock().expect("store mutex poisoned");

        let Some((hostname, dto)) = file
            .records
            .iter()
            .find(|(_, dto)| dto.id == id)
            .map(|(h, dto)| (h.clone(), dto.clone()))
        else {
            return Ok(None);
        };

        if dto.token.as_ref() != expected_token {
            return Ok(None);
        }

        let mut next = file.clone();
        let entry = next.records.get_mut(&hostname).expect("record just found");
        let now = OffsetDateTime::now_utc();
        entry.status = status;
        entry.last_checked_at = Some(now);
        if status == VerificationStatus::Verified && entry.verified_at.is_none() {
            entry.verified_at = Some(now);
        }

        let updated = entry.clone().into_record(&hostname)?;
        self.persist(&next)?;
        *file = next;
        Ok(Some(updated))
    }

    /// Remove a record by id. Returns the removed record, or `None` if
    /// it was already gone.
    pub fn remove(&self, id: Uuid) -> Result<Option<DomainRecord>, StoreError> {
        let mut file = self.inner.lock().expect("store mutex poisoned");

        let Some(hostname) = file
            .records
            .iter()
            .find(|(_, dto)| dto.id == id)
            .map(|(h, _)| h.clone())
        else {
            return Ok(None);
        };

        let mut next = file.clone();
        let removed = next
            .records
            .remove(&hostname)
            .expect("record just found")
            .into_record(&hostname)?;

        self.persist(&next)?;
        *file = next;
        Ok(Some(removed))
    }

    /// Ids of records still moving through verification, for the
    /// re-check scheduler.
    pub fn non_terminal_ids(&self) -> Vec<Uuid> {
        let file = self.inner.lock().expect("store mutex poisoned");
        file.records
            .values()
            .filter(|dto| !dto.status.is_terminal())
            .map(|dto| dto.id)
            .collect()
    }

    // Page directory: ownership lookups for the page-store collaborator.

    pub fn page_owner(&self, page: &PageId) -> Option<UserId> {
        let file = self.inner.lock().expect("store mutex poisoned");
        file.pages.get(page.as_str()).map(|p| p.owner.clone())
    }

    pub fn upsert_page(&self, page: PageId, owner: UserId) -> Result<(), StoreError> {
        let mut file = self.inner.lock().expect("store mutex poisoned");
        let mut next = file.clone();
        next.pages
            .insert(page.as_str().to_string(), PageDto { owner });
        self.persist(&next)?;
        *file = next;
        Ok(())
    }
}
