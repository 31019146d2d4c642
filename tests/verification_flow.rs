//! End-to-end verification flow through the public crate API: connect a
//! custom domain, walk it through the DNS challenge with a scripted
//! checker, and confirm the resolver only ever serves verified records.

use std::net::Ipv4Addr;

use tempfile::TempDir;

use linkhub::application::claim_subdomain::ClaimSubdomain;
use linkhub::application::connect_domain::ConnectDomain;
use linkhub::application::resolve_hostname::ResolveHostname;
use linkhub::application::verify_domain::{VerifyDomain, VerifyOutcome};
use linkhub::application::ClaimError;
use linkhub::domain::{
    DomainKind, PageId, ReservedNames, RoutingTargets, UserId, VerificationStatus,
};
use linkhub::infrastructure::dns::fake::RoutingQuery;
use linkhub::infrastructure::dns::FakeChecker;
use linkhub::infrastructure::store::DomainStore;

const PLATFORM: &str = "linkhub.com";
const EDGE: Ipv4Addr = Ipv4Addr::new(76, 76, 21, 21);

fn targets() -> RoutingTargets {
    RoutingTargets {
        edge_ip: EDGE,
        canonical_host: "edge.linkhub.com".to_string(),
    }
}

fn open_store(dir: &TempDir) -> DomainStore {
    DomainStore::open(dir.path().join("store.toml")).unwrap()
}

#[tokio::test]
async fn root_domain_connect_verify_resolve() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let targets = targets();
    let owner = UserId::new("user-1");

    // Messy input normalizes down to the bare hostname.
    let connect = ConnectDomain::new(&store, PLATFORM, &targets);
    let result = connect.execute(&owner, "  https://MySite.com/  ").unwrap();
    assert_eq!(result.record.hostname.as_str(), "mysite.com");
    assert_eq!(result.record.status, VerificationStatus::Pending);

    // The user gets both records up front: the TXT challenge and, for a
    // root domain, an A record at the edge IP.
    let types: Vec<&str> = result.instructions.iter().map(|i| i.record_type).collect();
    assert_eq!(types, vec!["TXT", "A"]);
    assert_eq!(result.instructions[0].host, "_linkhub-verify.mysite.com");

    let checker = FakeChecker::new(targets.clone());
    let verify = VerifyDomain::new(&store, &checker, &targets);
    let resolve = ResolveHostname::new(&store);

    // Nothing published yet: ownership unproven, nothing resolves.
    let outcome = verify.execute_for_owner(&owner).await.unwrap();
    assert!(matches!(outcome, VerifyOutcome::OwnershipUnproven { .. }));
    assert!(resolve.execute("mysite.com").unwrap().is_none());

    // TXT alone proves ownership but routing is still missing.
    let token = result.record.token.clone().unwrap();
    checker.set_txt(&result.record.hostname, token.as_str());
    let outcome = verify.execute_for_owner(&owner).await.unwrap();
    let VerifyOutcome::RoutingNotConfigured { expected, .. } = outcome else {
        panic!("expected RoutingNotConfigured");
    };
    assert_eq!(expected.record_type, "A");
    assert_eq!(expected.value, EDGE.to_string());
    assert!(resolve.execute("mysite.com").unwrap().is_none());

    // A record lands: verified, stamped, and resolvable.
    checker.set_a(&result.record.hostname, EDGE);
    let outcome = verify.execute_for_owner(&owner).await.unwrap();
    let VerifyOutcome::Verified(record) = outcome else {
        panic!("expected Verified");
    };
    assert!(record.verified_at.is_some());

    let tenant = resolve.execute("MySite.com:443").unwrap().unwrap();
    assert_eq!(tenant.user_id, owner);
    assert_eq!(tenant.kind, DomainKind::Custom);
}

#[tokio::test]
async fn subdomain_routes_via_cname() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let targets = targets();
    let owner = UserId::new("user-2");

    let result = ConnectDomain::new(&store, PLATFORM, &targets)
        .execute(&owner, "links.mysite.org")
        .unwrap();
    let token = result.record.token.clone().unwrap();

    let checker = FakeChecker::new(targets.clone());
    checker.set_txt(&result.record.hostname, token.as_str());
    checker.set_cname(&result.record.hostname, "edge.linkhub.com.");

    let verify = VerifyDomain::new(&store, &checker, &targets);
    let outcome = verify.execute_for_owner(&owner).await.unwrap();
    assert!(outcome.is_verified());

    // A three-label hostname is checked with CNAME, never A.
    assert_eq!(
        checker.routing_queries(),
        vec![RoutingQuery::Cname("links.mysite.org".to_string())]
    );
}

#[tokio::test]
async fn reconnect_reissues_token_and_resets_verification() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let targets = targets();
    let owner = UserId::new("user-3");

    let connect = ConnectDomain::new(&store, PLATFORM, &targets);
    let first = connect.execute(&owner, "first.example.com").unwrap();
    let first_token = first.record.token.clone().unwrap();

    // Verify the first domain fully.
    let checker = FakeChecker::new(targets.clone());
    checker.set_txt(&first.record.hostname, first_token.as_str());
    checker.set_cname(&first.record.hostname, "edge.linkhub.com");
    let verify = VerifyDomain::new(&store, &checker, &targets);
    assert!(verify.execute_for_owner(&owner).await.unwrap().is_verified());

    // Reconnecting to a different domain replaces the record: fresh
    // token, back to pending, and the old hostname stops resolving.
    let second = connect.execute(&owner, "second.example.com").unwrap();
    assert_eq!(second.record.status, VerificationStatus::Pending);
    assert_ne!(
        second.record.token.as_ref().unwrap().as_str(),
        first_token.as_str()
    );

    let resolve = ResolveHostname::new(&store);
    assert!(resolve.execute("first.example.com").unwrap().is_none());
    assert!(resolve.execute("second.example.com").unwrap().is_none());
    assert!(store.find_by_hostname("first.example.com").unwrap().is_none());
}

#[tokio::test]
async fn platform_subdomains_are_guarded_and_born_verified() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let reserved = ReservedNames::with_extra(Vec::<String>::new());
    let owner = UserId::new("user-4");
    let page = PageId::new("page-1");
    store.upsert_page(page.clone(), owner.clone()).unwrap();

    let claim = ClaimSubdomain::new(&store, &reserved, PLATFORM);

    // Reserved names are rejected, including the numeric-suffix dodge.
    let err = claim.execute(&owner, &page, "admin").unwrap_err();
    assert!(matches!(err, ClaimError::Reserved(_)));
    let err = claim.execute(&owner, &page, "admin2").unwrap_err();
    assert!(matches!(err, ClaimError::Reserved(_)));

    // A permitted label is claimed verified immediately and resolves
    // without any DNS check.
    let record = claim.execute(&owner, &page, "myname").unwrap();
    assert_eq!(record.hostname.as_str(), "myname.linkhub.com");
    assert_eq!(record.status, VerificationStatus::Verified);

    let tenant = ResolveHostname::new(&store)
        .execute("myname.linkhub.com")
        .unwrap()
        .unwrap();
    assert_eq!(tenant.kind, DomainKind::PlatformSubdomain);
    assert_eq!(tenant.page, Some(page));
}

#[test]
fn custom_domain_may_not_squat_the_platform_namespace() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let targets = targets();
    let owner = UserId::new("user-5");

    let connect = ConnectDomain::new(&store, PLATFORM, &targets);
    for raw in ["linkhub.com", "evil.linkhub.com"] {
        let err = connect.execute(&owner, raw).unwrap_err();
        assert!(matches!(err, ClaimError::Hostname(_)), "{raw}");
    }
}
