use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainRecord, UserId};
use crate::infrastructure::store::DomainStore;

use super::ClaimError;

/// Use case: disconnect a domain. Removal is the only exit from
/// `verified` besides reconnecting under a fresh token.
pub struct RemoveDomain<'a> {
    store: &'a DomainStore,
}

impl<'a> RemoveDomain<'a> {
    pub fn new(store: &'a DomainStore) -> Self {
        Self { store }
    }

    /// Remove the caller's account-level custom domain.
    pub fn execute_for_owner(&self, owner: &UserId) -> Result<DomainRecord, ClaimError> {
        let record = self
            .store
            .find_custom_by_owner(owner)?
            .ok_or(ClaimError::NoDomainConfigured)?;

        let removed = self
            .store
            .remove(record.id)?
            .ok_or_else(|| ClaimError::NotFound(record.hostname.to_string()))?;

        info!(hostname = %removed.hostname, owner = %removed.owner, "custom domain removed");
        Ok(removed)
    }

    /// Remove a specific record the caller owns (subdomains included).
    pub fn execute_record(&self, owner: &UserId, id: Uuid) -> Result<DomainRecord, ClaimError> {
        let record = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| ClaimError::NotFound(id.to_string()))?;

        if &record.owner != owner {
            return Err(ClaimError::NotAuthorized);
        }

        let removed = self
            .store
            .remove(id)?
            .ok_or_else(|| ClaimError::NotFound(id.to_string()))?;

        info!(hostname = %removed.hostname, owner = %removed.owner, "domain record removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Hostname, VerificationToken};
    use tempfile::TempDir;

    #[test]
    fn removes_own_domain_and_rejects_foreign() {
        let dir = TempDir::new().unwrap();
        let store = DomainStore::open(dir.path().join("store.toml")).unwrap();
        let record = store
            .claim(DomainRecord::new_custom(
                UserId::new("u1"),
                Hostname::from_stored("mysite.com".to_string()).unwrap(),
                VerificationToken::issue(),
            ))
            .unwrap();

        let remove = RemoveDomain::new(&store);

        let err = remove
            .execute_record(&UserId::new("intruder"), record.id)
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotAuthorized));

        remove.execute_for_owner(&UserId::new("u1")).unwrap();
        assert!(store.find_by_hostname("mysite.com").unwrap().is_none());

        let err = remove.execute_for_owner(&UserId::new("u1")).unwrap_err();
        assert!(matches!(err, ClaimError::NoDomainConfigured));
    }
}
