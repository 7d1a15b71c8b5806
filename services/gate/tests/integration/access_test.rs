use chrono::Duration;

use photofind_access_types::token::SessionCodec;
use photofind_gate::domain::repository::CodeStore;
use photofind_gate::infra::memory::MemoryCodeStore;
use photofind_gate::usecase::access::CheckAccessUseCase;
use photofind_testing::clock::ManualClock;

use crate::helpers::{admin, codec, test_code, user};

fn checker(store: &MemoryCodeStore) -> CheckAccessUseCase<MemoryCodeStore> {
    CheckAccessUseCase {
        store: store.clone(),
        codec: codec(),
    }
}

#[tokio::test]
async fn should_authorize_admin_without_cookie() {
    let store = MemoryCodeStore::new();

    assert!(checker(&store).execute(Some(&admin()), None).await.unwrap());
}

#[tokio::test]
async fn should_deny_without_cookie() {
    let store = MemoryCodeStore::new();

    assert!(!checker(&store).execute(None, None).await.unwrap());
    assert!(!checker(&store).execute(Some(&user()), None).await.unwrap());
}

#[tokio::test]
async fn should_authorize_cookie_for_existing_record() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    let mut code = test_code("abc123", &clock);
    code.used = true;
    store.put(&code).await.unwrap();
    let token = codec().encode("abc123").unwrap();

    assert!(
        checker(&store)
            .execute(Some(&user()), Some(&token))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_ignore_record_age_for_sessions() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    clock.advance(Duration::days(400));
    let token = codec().encode("abc123").unwrap();

    assert!(checker(&store).execute(None, Some(&token)).await.unwrap());
}

#[tokio::test]
async fn should_deny_when_record_is_gone() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    let token = codec().encode("abc123").unwrap();

    store.delete("abc123").await.unwrap();

    assert!(!checker(&store).execute(None, Some(&token)).await.unwrap());
}

#[tokio::test]
async fn should_deny_tampered_cookie() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    let token = codec().encode("abc123").unwrap();
    let at = token.len() - 5;
    let replacement = if &token[at..=at] == "A" { "B" } else { "A" };
    let token = format!("{}{}{}", &token[..at], replacement, &token[at + 1..]);

    assert!(!checker(&store).execute(None, Some(&token)).await.unwrap());
}

#[tokio::test]
async fn should_deny_cookie_signed_with_other_secret() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    store.put(&test_code("abc123", &clock)).await.unwrap();
    let token = SessionCodec::new(b"another-secret").encode("abc123").unwrap();

    assert!(!checker(&store).execute(None, Some(&token)).await.unwrap());
}

#[tokio::test]
async fn should_deny_garbage_cookie() {
    let store = MemoryCodeStore::new();

    assert!(!checker(&store).execute(None, Some("garbage")).await.unwrap());
}
