use tracing::info;

use crate::domain::{DomainRecord, Hostname, PageId, ReservedNames, SubdomainLabel, UserId};
use crate::infrastructure::store::DomainStore;

use super::ClaimError;

/// Use case: claim a free `<label>.<platform>` subdomain for one of the
/// caller's pages.
///
/// The platform allocates the name itself, so the record is created
/// already verified; the gates are label syntax, the reserved list and
/// global availability. Page ownership is checked before anything else
/// touches the store.
pub struct ClaimSubdomain<'a> {
    store: &'a DomainStore,
    reserved: &'a ReservedNames,
    platform_domain: &'a str,
}

impl<'a> ClaimSubdomain<'a> {
    pub fn new(
        store: &'a DomainStore,
        reserved: &'a ReservedNames,
        platform_domain: &'a str,
    ) -> Self {
        Self {
            store,
            reserved,
            platform_domain,
        }
    }

    pub fn execute(
        &self,
        owner: &UserId,
        page: &PageId,
        raw_label: &str,
    ) -> Result<DomainRecord, ClaimError> {
        let label = SubdomainLabel::parse(raw_label)?;

        if self.reserved.is_reserved(label.as_str()) {
            return Err(ClaimError::Reserved(label.to_string()));
        }

        match self.store.page_owner(page) {
            None => return Err(ClaimError::PageNotFound(page.to_string())),
            Some(page_owner) if &page_owner != owner => return Err(ClaimError::NotAuthorized),
            Some(_) => {}
        }

        let hostname = Hostname::platform_subdomain(label.as_str(), self.platform_domain)?;

        if !self.store.is_available(&hostname, owner) {
            return Err(ClaimError::AlreadyClaimed(hostname.to_string()));
        }

        let record =
            DomainRecord::new_platform_subdomain(owner.clone(), page.clone(), hostname);
        let record = self.store.claim(record)?;

        info!(hostname = %record.hostname, owner = %record.owner, "free subdomain claimed");
        Ok(record)
    }
}
