//! Deterministic checker for tests: scripted zone data, recorded
//! queries, no network. Lives in the crate (not behind `cfg(test)`) so
//! integration tests can drive the whole verification flow with it.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Hostname, RoutingTargets, VerificationToken, challenge_host};

use super::{ChallengeCheck, DnsCheckError, DnsChecker, a_routing_ok, cname_routing_ok, txt_matches};

/// Which routing lookup the checker performed for a hostname. Tests use
/// this to assert the root-vs-subdomain branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingQuery {
    A(String),
    Cname(String),
}

#[derive(Default)]
struct FakeZone {
    txt: HashMap<String, Vec<String>>,
    a: HashMap<String, Vec<Ipv4Addr>>,
    cname: HashMap<String, Vec<String>>,
    fail_next: bool,
    routing_queries: Vec<RoutingQuery>,
}

pub struct FakeChecker {
    targets: RoutingTargets,
    zone: Mutex<FakeZone>,
}

impl FakeChecker {
    pub fn new(targets: RoutingTargets) -> Self {
        Self {
            targets,
            zone: Mutex::new(FakeZone::default()),
        }
    }

    /// Publish the TXT challenge for `hostname` with the given value.
    pub fn set_txt(&self, hostname: &Hostname, value: &str) {
        self.zone
            .lock()
            .unwrap()
            .txt
            .entry(challenge_host(hostname))
            .or_default()
            .push(value.to_string());
    }

    pub fn set_a(&self, hostname: &Hostname, addr: Ipv4Addr) {
        self.zone
            .lock()
            .unwrap()
            .a
            .entry(hostname.as_str().to_string())
            .or_default()
            .push(addr);
    }

    pub fn set_cname(&self, hostname: &Hostname, target: &str) {
        self.zone
            .lock()
            .unwrap()
            .cname
            .entry(hostname.as_str().to_string())
            .or_default()
            .push(target.to_string());
    }

    /// Make the next `check` fail with a transient resolver error.
    pub fn fail_next(&self) {
        self.zone.lock().unwrap().fail_next = true;
    }

    pub fn routing_queries(&self) -> Vec<RoutingQuery> {
        self.zone.lock().unwrap().routing_queries.clone()
    }
}

#[async_trait]
impl DnsChecker for FakeChecker {
    async fn check(
        &self,
        hostname: &Hostname,
        token: &VerificationToken,
    ) -> Result<ChallengeCheck, DnsCheckError> {
        let mut zone = self.zone.lock().unwrap();

        if std::mem::take(&mut zone.fail_next) {
            return Err(DnsCheckError::Transient("simulated SERVFAIL".to_string()));
        }

        let txt_records = zone
            .txt
            .get(&challenge_host(hostname))
            .cloned()
            .unwrap_or_default();
        let txt_verified = txt_matches(&txt_records, token);

        if !txt_verified {
            return Ok(ChallengeCheck {
                txt_verified: false,
                routing_ok: false,
            });
        }

        let routing_ok = if hostname.is_root_domain() {
            zone.routing_queries
                .push(RoutingQuery::A(hostname.as_str().to_string()));
            let addrs = zone.a.get(hostname.as_str()).cloned().unwrap_or_default();
            a_routing_ok(&addrs, self.targets.edge_ip)
        } else {
            zone.routing_queries
                .push(RoutingQuery::Cname(hostname.as_str().to_string()));
            let cnames = zone.cname.get(hostname.as_str()).cloned().unwrap_or_default();
            cname_routing_ok(&cnames, &self.targets.canonical_host)
        };

        Ok(ChallengeCheck {
            txt_verified,
            routing_ok,
        })
    }
}
