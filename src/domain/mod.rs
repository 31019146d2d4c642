pub mod challenge;
mod record;
mod reserved;
pub mod value_objects;

pub use challenge::{
    CHALLENGE_LABEL, DnsRecordInstruction, RoutingTargets, challenge_host, instructions_for,
};
pub use record::{DomainKind, DomainRecord, VerificationStatus};
pub use reserved::ReservedNames;
pub use value_objects::{
    Hostname, HostnameError, PageId, SubdomainLabel, SubdomainLabelError, UserId,
    VerificationToken,
};
