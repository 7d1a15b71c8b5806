use chrono::Duration;
use tracing::{info, warn};

use photofind_core::clock::{Clock, SharedClock};
use photofind_core::retry::{RetryPolicy, with_retry};

use crate::domain::repository::{CodeStore, CodeTxn};
use crate::domain::types::CleanupOutcome;
use crate::error::GateError;

// ── Cleanup job ──────────────────────────────────────────────────────────────

/// Deferred cleanup for one code: delete it only if it was never redeemed.
///
/// Idempotent, so the job may run any number of times and at any point after
/// its deadline. Racing a redemption is safe: both run in store
/// transactions, so either the delete sees `used == true` or the redemption
/// sees no record.
#[derive(Clone)]
pub struct CleanupCodeUseCase<S: CodeStore> {
    pub store: S,
    pub retry: RetryPolicy,
}

impl<S: CodeStore> CleanupCodeUseCase<S> {
    pub async fn execute(&self, id: &str) -> Result<CleanupOutcome, GateError> {
        with_retry(&self.retry, || {
            let id = id.to_owned();
            self.store.transact(move |txn| {
                Box::pin(async move {
                    let Some(code) = txn.get(&id).await? else {
                        return Ok(CleanupOutcome::Missing);
                    };
                    if code.used {
                        return Ok(CleanupOutcome::Kept);
                    }
                    txn.delete(&id).await?;
                    Ok::<_, GateError>(CleanupOutcome::Deleted)
                })
            })
        })
        .await
    }

    /// Scheduled entry point. Best effort: failures are logged and dropped.
    pub async fn run(&self, id: &str) -> Option<CleanupOutcome> {
        match self.execute(id).await {
            Ok(outcome) => {
                if outcome == CleanupOutcome::Deleted {
                    info!(code_id = %id, "expired access code deleted");
                }
                Some(outcome)
            }
            Err(e) => {
                warn!(code_id = %id, error = %e, "access code cleanup failed");
                None
            }
        }
    }
}

// ── Stale sweep ──────────────────────────────────────────────────────────────

/// Run the cleanup job for every unused code older than the TTL. Covers jobs
/// whose timer was lost, e.g. across a restart.
pub struct SweepStaleCodesUseCase<S: CodeStore> {
    pub cleanup: CleanupCodeUseCase<S>,
    pub clock: SharedClock,
    pub ttl: Duration,
}

impl<S: CodeStore> SweepStaleCodesUseCase<S> {
    /// Returns how many codes were deleted.
    pub async fn execute(&self) -> Result<usize, GateError> {
        let cutoff = self.clock.now() - self.ttl;
        let ids = self.cleanup.store.stale_unused(cutoff).await?;
        let mut deleted = 0;
        for id in &ids {
            if self.cleanup.run(id).await == Some(CleanupOutcome::Deleted) {
                deleted += 1;
            }
        }
        if !ids.is_empty() {
            info!(candidates = ids.len(), deleted, "stale access code sweep finished");
        }
        Ok(deleted)
    }
}
