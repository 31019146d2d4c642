use std::net::Ipv4Addr;

use serde::Serialize;

use super::value_objects::{Hostname, VerificationToken};

/// Label under which the TXT challenge is published:
/// `_linkhub-verify.<hostname>`.
pub const CHALLENGE_LABEL: &str = "_linkhub-verify";

/// Where verified traffic must be routed: the platform's anycast edge IP
/// (root domains, A record) and canonical edge hostname (subdomains,
/// CNAME). Injected from configuration.
#[derive(Debug, Clone)]
pub struct RoutingTargets {
    pub edge_ip: Ipv4Addr,
    pub canonical_host: String,
}

/// The DNS record the challenge lives at for a given hostname.
pub fn challenge_host(hostname: &Hostname) -> String {
    format!("{}.{}", CHALLENGE_LABEL, hostname.as_str())
}

/// One DNS record the user must create at their provider, rendered
/// verbatim in API responses so the next step is never ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecordInstruction {
    pub record_type: &'static str,
    pub host: String,
    pub value: String,
    pub purpose: &'static str,
}

impl DnsRecordInstruction {
    pub fn txt_challenge(hostname: &Hostname, token: &VerificationToken) -> Self {
        Self {
            record_type: "TXT",
            host: challenge_host(hostname),
            value: token.as_str().to_string(),
            purpose: "Required for domain verification",
        }
    }

    /// Root domains need an A record (apexes cannot carry a CNAME);
    /// everything deeper points a CNAME at the canonical edge hostname.
    pub fn routing(hostname: &Hostname, targets: &RoutingTargets) -> Self {
        if hostname.is_root_domain() {
            Self {
                record_type: "A",
                host: hostname.as_str().to_string(),
                value: targets.edge_ip.to_string(),
                purpose: "Required for root domains",
            }
        } else {
            Self {
                record_type: "CNAME",
                host: hostname.as_str().to_string(),
                value: targets.canonical_host.clone(),
                purpose: "Points your domain to LinkHub",
            }
        }
    }
}

/// The full instruction set for a pending custom domain.
pub fn instructions_for(
    hostname: &Hostname,
    token: &VerificationToken,
    targets: &RoutingTargets,
) -> Vec<DnsRecordInstruction> {
    vec![
        DnsRecordInstruction::txt_challenge(hostname, token),
        DnsRecordInstruction::routing(hostname, targets),
    ]
}
