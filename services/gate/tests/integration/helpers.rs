use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;

use photofind_access_types::identity::{Identity, IdentityVerifier};
use photofind_access_types::token::SessionCodec;
use photofind_core::clock::Clock;
use photofind_core::retry::RetryPolicy;
use photofind_gate::domain::repository::{Annotator, BoxFuture, CleanupScheduler};
use photofind_gate::domain::types::AccessCode;
use photofind_gate::error::GateError;
use photofind_gate::infra::memory::MemoryCodeStore;
use photofind_gate::router::build_router;
use photofind_gate::state::{AccessSettings, AppState};
use photofind_testing::auth::TEST_IDENTITY_SECRET;
use photofind_testing::clock::ManualClock;

pub const TEST_SECRET: &str = "test-cookie-secret-for-unit-tests-only";

pub fn ttl() -> chrono::Duration {
    chrono::Duration::hours(24)
}

pub fn retry() -> RetryPolicy {
    RetryPolicy::with_max_attempts(10)
}

pub fn codec() -> SessionCodec {
    SessionCodec::new(TEST_SECRET.as_bytes())
}

pub fn admin() -> Identity {
    Identity {
        email: "admin@example.com".to_owned(),
        admin: true,
    }
}

pub fn user() -> Identity {
    Identity {
        email: "user@example.com".to_owned(),
        admin: false,
    }
}

/// Unused code created by the admin at the clock's current instant.
pub fn test_code(id: &str, clock: &ManualClock) -> AccessCode {
    AccessCode {
        id: id.to_owned(),
        created_at: clock.now(),
        created_by_email: "admin@example.com".to_owned(),
        created_by_admin: true,
        used: false,
    }
}

// ── RecordingScheduler ───────────────────────────────────────────────────────

/// Records every scheduled cleanup instead of running it.
#[derive(Clone, Default)]
pub struct RecordingScheduler {
    pub jobs: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl RecordingScheduler {
    pub fn jobs(&self) -> Vec<(String, Duration)> {
        self.jobs.lock().unwrap().clone()
    }
}

impl CleanupScheduler for RecordingScheduler {
    fn schedule_cleanup(&self, id: &str, delay: Duration) -> Result<(), GateError> {
        self.jobs.lock().unwrap().push((id.to_owned(), delay));
        Ok(())
    }
}

// ── FailingScheduler ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FailingScheduler;

impl CleanupScheduler for FailingScheduler {
    fn schedule_cleanup(&self, _id: &str, _delay: Duration) -> Result<(), GateError> {
        Err(GateError::Schedule("queue unavailable".to_owned()))
    }
}

// ── FakeAnnotator ────────────────────────────────────────────────────────────

/// Answers one `textAnnotations` entry per image describing its size.
pub struct FakeAnnotator;

impl Annotator for FakeAnnotator {
    fn annotate(
        &self,
        images: Vec<Vec<u8>>,
    ) -> BoxFuture<'_, Result<Vec<serde_json::Value>, GateError>> {
        Box::pin(async move {
            Ok(images
                .iter()
                .map(|image| {
                    serde_json::json!({
                        "textAnnotations": [{ "description": format!("{} bytes", image.len()) }]
                    })
                })
                .collect())
        })
    }
}

// ── App fixtures ─────────────────────────────────────────────────────────────

pub fn test_state(store: MemoryCodeStore, clock: &ManualClock) -> AppState<MemoryCodeStore> {
    AppState::new(
        store,
        codec(),
        IdentityVerifier::new(TEST_IDENTITY_SECRET.as_bytes()),
        Arc::new(FakeAnnotator),
        clock.shared(),
        AccessSettings {
            code_ttl: ttl(),
            retry: retry(),
            secure_cookies: false,
        },
    )
}

pub fn test_router(store: MemoryCodeStore, clock: &ManualClock) -> Router {
    build_router(test_state(store, clock))
}

pub fn test_server(store: MemoryCodeStore, clock: &ManualClock) -> TestServer {
    TestServer::new(test_router(store, clock)).unwrap()
}
