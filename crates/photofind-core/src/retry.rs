//! Retry wrapper for operations that can lose an optimistic-concurrency race.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::RngExt;

/// Errors that may succeed when the whole operation is run again.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Bounds for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Exponential backoff before the attempt following `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1 << shift)
            .min(self.max_backoff)
    }
}

fn jittered(delay: Duration) -> Duration {
    let mut rng = rand::rng();
    delay.mul_f64(rng.random_range(0.5..=1.0))
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` is reached. The last error is returned unchanged.
///
/// `operation` is invoked afresh for every attempt, so it must re-read any
/// state it depends on.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = jittered(policy.backoff(attempt));
                tracing::debug!(
                    attempt,
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after conflict"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
