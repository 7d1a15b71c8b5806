use std::collections::HashSet;

use photofind_core::clock::Clock;
use photofind_gate::domain::repository::CodeStore;
use photofind_gate::error::GateError;
use photofind_gate::infra::memory::MemoryCodeStore;
use photofind_gate::usecase::issue::IssueCodeUseCase;
use photofind_testing::clock::ManualClock;

use crate::helpers::{FailingScheduler, RecordingScheduler, admin, retry, ttl, user};

fn issuer(
    store: &MemoryCodeStore,
    scheduler: RecordingScheduler,
    clock: &ManualClock,
) -> IssueCodeUseCase<MemoryCodeStore, RecordingScheduler> {
    IssueCodeUseCase {
        store: store.clone(),
        scheduler,
        clock: clock.shared(),
        ttl: ttl(),
        retry: retry(),
    }
}

#[tokio::test]
async fn should_persist_unused_code_with_issuer_fields() {
    let store = MemoryCodeStore::new();
    let scheduler = RecordingScheduler::default();
    let clock = ManualClock::epoch();

    let issued = issuer(&store, scheduler.clone(), &clock)
        .execute(&admin())
        .await
        .unwrap();

    assert_eq!(issued.share_path, format!("/?code={}", issued.id));
    let code = store.get(&issued.id).await.unwrap().unwrap();
    assert!(!code.used);
    assert_eq!(code.created_at, clock.now());
    assert_eq!(code.created_by_email, "admin@example.com");
    assert!(code.created_by_admin);
}

#[tokio::test]
async fn should_schedule_cleanup_after_ttl() {
    let store = MemoryCodeStore::new();
    let scheduler = RecordingScheduler::default();
    let clock = ManualClock::epoch();

    let issued = issuer(&store, scheduler.clone(), &clock)
        .execute(&admin())
        .await
        .unwrap();

    assert_eq!(
        scheduler.jobs(),
        vec![(issued.id, std::time::Duration::from_secs(24 * 60 * 60))]
    );
}

#[tokio::test]
async fn should_roll_back_when_cleanup_cannot_be_scheduled() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    let usecase = IssueCodeUseCase {
        store: store.clone(),
        scheduler: FailingScheduler,
        clock: clock.shared(),
        ttl: ttl(),
        retry: retry(),
    };

    let result = usecase.execute(&admin()).await;

    assert!(
        matches!(result, Err(GateError::Schedule(_))),
        "expected Schedule, got {result:?}"
    );
    assert!(store.is_empty(), "no record may outlive a failed schedule");
}

#[tokio::test]
async fn should_reject_non_admin_issuer() {
    let store = MemoryCodeStore::new();
    let scheduler = RecordingScheduler::default();
    let clock = ManualClock::epoch();

    let result = issuer(&store, scheduler.clone(), &clock)
        .execute(&user())
        .await;

    assert!(matches!(result, Err(GateError::Forbidden)));
    assert!(store.is_empty());
    assert!(scheduler.jobs().is_empty());
}

#[tokio::test]
async fn should_issue_distinct_ids() {
    let store = MemoryCodeStore::new();
    let clock = ManualClock::epoch();
    let usecase = issuer(&store, RecordingScheduler::default(), &clock);

    let mut ids = HashSet::new();
    for _ in 0..50 {
        ids.insert(usecase.execute(&admin()).await.unwrap().id);
    }

    assert_eq!(ids.len(), 50);
    assert_eq!(store.len(), 50);
}
