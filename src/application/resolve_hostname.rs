use serde::Serialize;

use crate::domain::{DomainKind, PageId, UserId};
use crate::infrastructure::store::{DomainStore, StoreError};

/// What the edge needs to know to serve a tenant's page: who owns the
/// hostname and which page it routes to. Content fetching and
/// rendering stay with the page-store collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct TenantContent {
    pub user_id: UserId,
    pub page: Option<PageId>,
    pub hostname: String,
    pub kind: DomainKind,
}

/// Use case: map an inbound request hostname to its tenant.
///
/// Only `verified` records resolve. A pending or failed claim must
/// never receive traffic: until the DNS proof lands, the hostname may
/// still legitimately belong to someone else.
pub struct ResolveHostname<'a> {
    store: &'a DomainStore,
}

impl<'a> ResolveHostname<'a> {
    pub fn new(store: &'a DomainStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, raw_host: &str) -> Result<Option<TenantContent>, StoreError> {
        // Host headers arrive in any case and may carry a port.
        let host = raw_host.trim().to_lowercase();
        let host = host.split(':').next().unwrap_or(&host);

        let Some(record) = self.store.find_by_hostname(host)? else {
            return Ok(None);
        };

        if !record.is_verified() {
            return Ok(None);
        }

        Ok(Some(TenantContent {
            user_id: record.owner,
            page: record.page,
            hostname: record.hostname.to_string(),
            kind: record.kind,
        }))
    }
}
