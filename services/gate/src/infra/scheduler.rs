use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use photofind_core::retry::RetryPolicy;

use crate::domain::repository::{CleanupScheduler, CodeStore};
use crate::error::GateError;
use crate::usecase::cleanup::{CleanupCodeUseCase, SweepStaleCodesUseCase};

/// Runs each cleanup job on a tokio timer in this process.
///
/// Timers do not survive a restart; [`spawn_sweeper`] picks up whatever they
/// leave behind.
#[derive(Clone)]
pub struct TokioCleanupScheduler<S: CodeStore> {
    cleanup: CleanupCodeUseCase<S>,
}

impl<S: CodeStore> TokioCleanupScheduler<S> {
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        Self {
            cleanup: CleanupCodeUseCase { store, retry },
        }
    }
}

impl<S: CodeStore> CleanupScheduler for TokioCleanupScheduler<S> {
    fn schedule_cleanup(&self, id: &str, delay: Duration) -> Result<(), GateError> {
        let runtime = Handle::try_current().map_err(|e| GateError::Schedule(e.to_string()))?;
        let cleanup = self.cleanup.clone();
        let id = id.to_owned();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            cleanup.run(&id).await;
        });
        Ok(())
    }
}

/// Sweep immediately, then every `every`.
pub fn spawn_sweeper<S: CodeStore>(
    sweep: SweepStaleCodesUseCase<S>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = sweep.execute().await {
                warn!(error = %e, "stale access code sweep failed");
            }
        }
    })
}
