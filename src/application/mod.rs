pub mod claim_subdomain;
pub mod connect_domain;
pub mod remove_domain;
pub mod resolve_hostname;
pub mod verify_domain;

use thiserror::Error;

use crate::domain::{HostnameError, SubdomainLabelError, UserId};
use crate::infrastructure::store::StoreError;

/// Authenticated caller identity, supplied by the platform's auth
/// collaborator on every mutating call. The core trusts it for
/// ownership checks.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

/// Synchronous rejections of a claim or management operation. DNS-check
/// outcomes are deliberately NOT here: a failed verification is a
/// normal, retryable result (`VerifyOutcome`), not an error.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Hostname(#[from] HostnameError),

    #[error(transparent)]
    Label(#[from] SubdomainLabelError),

    #[error("This subdomain is reserved and cannot be claimed: {0}")]
    Reserved(String),

    #[error("This domain is already in use by another account: {0}")]
    AlreadyClaimed(String),

    #[error("Domain not found: {0}")]
    NotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Not authorized to manage this resource")]
    NotAuthorized,

    #[error("No custom domain configured")]
    NoDomainConfigured,

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            // The store's uniqueness rejection is the user-facing
            // collision, not a system fault.
            StoreError::HostnameTaken(hostname) => Self::AlreadyClaimed(hostname),
            other => Self::Store(other),
        }
    }
}
