mod hostname;
mod ids;
mod subdomain_label;
mod token;

pub use hostname::{Hostname, HostnameError};
pub use ids::{PageId, UserId};
pub use subdomain_label::{SubdomainLabel, SubdomainLabelError};
pub use token::{TOKEN_PREFIX, VerificationToken};
