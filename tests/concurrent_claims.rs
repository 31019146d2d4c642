//! Two accounts racing to claim the same hostname: exactly one wins,
//! the loser gets a collision error, and the store ends up with a
//! single record for the name.

use std::net::Ipv4Addr;
use std::sync::Barrier;

use tempfile::TempDir;

use linkhub::application::connect_domain::ConnectDomain;
use linkhub::application::ClaimError;
use linkhub::domain::{RoutingTargets, UserId};
use linkhub::infrastructure::store::DomainStore;

const PLATFORM: &str = "linkhub.com";

fn targets() -> RoutingTargets {
    RoutingTargets {
        edge_ip: Ipv4Addr::new(76, 76, 21, 21),
        canonical_host: "edge.linkhub.com".to_string(),
    }
}

#[test]
fn only_one_of_two_racing_connects_wins() {
    let dir = TempDir::new().unwrap();
    let store = DomainStore::open(dir.path().join("store.toml")).unwrap();
    let targets = targets();
    let barrier = Barrier::new(2);

    let results: Vec<Result<(), ClaimError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["user-a", "user-b"]
            .into_iter()
            .map(|user| {
                let store = &store;
                let targets = &targets;
                let barrier = &barrier;
                scope.spawn(move || {
                    let connect = ConnectDomain::new(store, PLATFORM, targets);
                    barrier.wait();
                    connect
                        .execute(&UserId::new(user), "contested.example.com")
                        .map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one claim must succeed");
    let loser = results.into_iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(loser.unwrap_err(), ClaimError::AlreadyClaimed(_)));

    // One record exists, owned by the winner.
    let record = store
        .find_by_hostname("contested.example.com")
        .unwrap()
        .unwrap();
    let owner = record.owner.clone();
    assert_eq!(store.records_for_owner(&owner).unwrap().len(), 1);
}

#[test]
fn racing_claims_for_distinct_names_both_win() {
    let dir = TempDir::new().unwrap();
    let store = DomainStore::open(dir.path().join("store.toml")).unwrap();
    let targets = targets();
    let barrier = Barrier::new(2);

    std::thread::scope(|scope| {
        for (user, host) in [("user-a", "a.example.com"), ("user-b", "b.example.com")] {
            let store = &store;
            let targets = &targets;
            let barrier = &barrier;
            scope.spawn(move || {
                let connect = ConnectDomain::new(store, PLATFORM, targets);
                barrier.wait();
                connect.execute(&UserId::new(user), host).unwrap();
            });
        }
    });

    assert!(store.find_by_hostname("a.example.com").unwrap().is_some());
    assert!(store.find_by_hostname("b.example.com").unwrap().is_some());
}
