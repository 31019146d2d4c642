pub mod auth;
pub mod recheck;
pub mod router;
pub mod server;

use crate::domain::{ReservedNames, RoutingTargets};
use crate::infrastructure::dns::DnsChecker;
use crate::infrastructure::store::DomainStore;

/// Everything the request handlers and the background re-checker share:
/// the record store, the DNS checker capability and the platform
/// routing identity.
pub struct Core {
    pub store: DomainStore,
    pub checker: Box<dyn DnsChecker>,
    pub targets: RoutingTargets,
    pub platform_domain: String,
    pub reserved: ReservedNames,
}

pub use server::Server;
