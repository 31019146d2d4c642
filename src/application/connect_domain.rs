use tracing::info;

use crate::domain::{
    DnsRecordInstruction, DomainRecord, Hostname, RoutingTargets, UserId, VerificationToken,
    instructions_for,
};
use crate::infrastructure::store::DomainStore;

use super::ClaimError;

/// Result of a successful connect: the pending record plus the exact
/// DNS records the user must now create at their provider.
#[derive(Debug)]
pub struct ConnectResult {
    pub record: DomainRecord,
    pub instructions: Vec<DnsRecordInstruction>,
}

/// Use case: connect a custom domain to the caller's account.
///
/// Validates and normalizes the hostname, checks global availability,
/// mints a fresh challenge token and persists the pending record.
/// Reconnecting always re-issues the token, so a previously leaked
/// challenge value is dead the moment the user resubmits.
pub struct ConnectDomain<'a> {
    store: &'a DomainStore,
    platform_domain: &'a str,
    targets: &'a RoutingTargets,
}

impl<'a> ConnectDomain<'a> {
    pub fn new(
        store: &'a DomainStore,
        platform_domain: &'a str,
        targets: &'a RoutingTargets,
    ) -> Self {
        Self {
            store,
            platform_domain,
            targets,
        }
    }

    pub fn execute(&self, owner: &UserId, raw_domain: &str) -> Result<ConnectResult, ClaimError> {
        let hostname = Hostname::parse(raw_domain, self.platform_domain)?;

        // The store's claim also rejects collisions atomically; this
        // pre-check exists for the friendlier error before any token is
        // minted.
        if !self.store.is_available(&hostname, owner) {
            return Err(ClaimError::AlreadyClaimed(hostname.to_string()));
        }

        let token = VerificationToken::issue();
        let record = DomainRecord::new_custom(owner.clone(), hostname, token);
        let record = self.store.claim(record)?;

        info!(hostname = %record.hostname, owner = %record.owner, "custom domain connected, pending verification");

        let instructions = instructions_for(
            &record.hostname,
            record.token.as_ref().expect("custom record carries a token"),
            self.targets,
        );

        Ok(ConnectResult {
            record,
            instructions,
        })
    }
}
