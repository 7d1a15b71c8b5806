use std::sync::Arc;

use chrono::Duration;

use photofind_gate::domain::repository::CodeStore;
use photofind_gate::error::GateError;
use photofind_gate::infra::memory::MemoryCodeStore;
use photofind_gate::usecase::redeem::RedeemCodeUseCase;
use photofind_testing::clock::ManualClock;

use crate::helpers::{codec, retry, test_code, ttl};

fn redeemer(store: &MemoryCodeStore, clock: &ManualClock) -> RedeemCodeUseCase<MemoryCodeStore> {
    RedeemCodeUseCase {
        store: store.clone(),
        codec: codec(),
        clock: clock.shared(),
        ttl: ttl(),
        retry: retry(),
    }
}

#[tokio::test]
async fn should_return_token_for_fresh_code() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();

    let token = redeemer(&store, &clock).execute("abc123").await.unwrap();

    assert_eq!(codec().decode(&token).unwrap(), "abc123");
    assert!(store.get("abc123").await.unwrap().unwrap().used);
}

#[tokio::test]
async fn should_reject_second_redemption() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    let usecase = redeemer(&store, &clock);

    usecase.execute("abc123").await.unwrap();
    let result = usecase.execute("abc123").await;

    assert!(
        matches!(result, Err(GateError::AlreadyUsed)),
        "expected AlreadyUsed, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_code() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();

    let result = redeemer(&store, &clock).execute("nope").await;

    assert!(matches!(result, Err(GateError::NotFound)));
}

#[tokio::test]
async fn should_reject_empty_code() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();

    let result = redeemer(&store, &clock).execute("").await;

    assert!(matches!(result, Err(GateError::NotFound)));
}

#[tokio::test]
async fn should_accept_just_before_ttl() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();

    clock.advance(ttl() - Duration::seconds(1));

    assert!(redeemer(&store, &clock).execute("abc123").await.is_ok());
}

#[tokio::test]
async fn should_reject_at_exact_ttl_without_latching() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();

    clock.advance(ttl());
    let result = redeemer(&store, &clock).execute("abc123").await;

    assert!(
        matches!(result, Err(GateError::Expired)),
        "expected Expired, got {result:?}"
    );
    let code = store.get("abc123").await.unwrap().unwrap();
    assert!(!code.used, "a rejected redemption must not flip the latch");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_succeed_exactly_once() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    let usecase = Arc::new(redeemer(&store, &clock));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let usecase = Arc::clone(&usecase);
            tokio::spawn(async move { usecase.execute("abc123").await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(GateError::AlreadyUsed) => {}
            Err(other) => panic!("unexpected redemption error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert!(store.get("abc123").await.unwrap().unwrap().used);
}
