use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::{RData, RecordType};
use tracing::debug;

use crate::domain::{Hostname, RoutingTargets, VerificationToken, challenge_host};

use super::{ChallengeCheck, DnsCheckError, DnsChecker, a_routing_ok, cname_routing_ok, txt_matches};

/// Live checker over `hickory-resolver`.
///
/// Every lookup is bounded by the configured timeout so a slow upstream
/// cannot hang a verification request.
pub struct HickoryChecker {
    resolver: TokioAsyncResolver,
    targets: RoutingTargets,
    timeout: Duration,
}

impl HickoryChecker {
    pub fn new(targets: RoutingTargets, timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;

        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
            targets,
            timeout,
        }
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<String>, DnsCheckError> {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.txt_lookup(host))
            .await
            .map_err(|_| DnsCheckError::Transient(format!("TXT lookup timed out for {}", host)))?;

        match lookup {
            Ok(txt) => Ok(txt
                .iter()
                .map(|record| {
                    record
                        .txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect()),
            Err(e) => absent_as_empty(e, "TXT", host),
        }
    }

    async fn lookup_a(&self, host: &str) -> Result<Vec<Ipv4Addr>, DnsCheckError> {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.ipv4_lookup(host))
            .await
            .map_err(|_| DnsCheckError::Transient(format!("A lookup timed out for {}", host)))?;

        match lookup {
            Ok(addrs) => Ok(addrs.iter().map(|a| a.0).collect()),
            Err(e) => absent_as_empty(e, "A", host),
        }
    }

    async fn lookup_cname(&self, host: &str) -> Result<Vec<String>, DnsCheckError> {
        let lookup = tokio::time::timeout(
            self.timeout,
            self.resolver.lookup(host, RecordType::CNAME),
        )
        .await
        .map_err(|_| DnsCheckError::Transient(format!("CNAME lookup timed out for {}", host)))?;

        match lookup {
            Ok(records) => Ok(records
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::CNAME(cname) => Some(cname.0.to_utf8()),
                    _ => None,
                })
                .collect()),
            Err(e) => absent_as_empty(e, "CNAME", host),
        }
    }
}

/// NXDOMAIN / no-records answers are expected while the user is still
/// editing their zone; they become an empty record set, not an error.
fn absent_as_empty<T>(e: ResolveError, rtype: &str, host: &str) -> Result<Vec<T>, DnsCheckError> {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => {
            debug!(host, rtype, "no records found");
            Ok(Vec::new())
        }
        _ => Err(DnsCheckError::Transient(format!(
            "{} lookup failed for {}: {}",
            rtype, host, e
        ))),
    }
}

#[async_trait]
impl DnsChecker for HickoryChecker {
    async fn check(
        &self,
        hostname: &Hostname,
        token: &VerificationToken,
    ) -> Result<ChallengeCheck, DnsCheckError> {
        let txt_host = challenge_host(hostname);
        let txt_records = self.lookup_txt(&txt_host).await?;
        let txt_verified = txt_matches(&txt_records, token);

        // Ownership gates routing: a domain that merely happens to
        // point at the platform from a prior owner must not verify.
        if !txt_verified {
            return Ok(ChallengeCheck {
                txt_verified: false,
                routing_ok: false,
            });
        }

        let routing_ok = if hostname.is_root_domain() {
            let addrs = self.lookup_a(hostname.as_str()).await?;
            a_routing_ok(&addrs, self.targets.edge_ip)
        } else {
            let cnames = self.lookup_cname(hostname.as_str()).await?;
            cname_routing_ok(&cnames, &self.targets.canonical_host)
        };

        debug!(hostname = %hostname, txt_verified, routing_ok, "challenge check complete");

        Ok(ChallengeCheck {
            txt_verified,
            routing_ok,
        })
    }
}
