use chrono::Duration;
use tracing::info;

use photofind_access_types::identity::Identity;
use photofind_core::clock::{Clock, SharedClock};
use photofind_core::retry::{RetryPolicy, with_retry};

use crate::domain::repository::{CleanupScheduler, CodeStore, CodeTxn};
use crate::domain::types::AccessCode;
use crate::error::GateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub id: String,
    /// Shareable path, `/?code=<id>`.
    pub share_path: String,
}

pub struct IssueCodeUseCase<S, Q>
where
    S: CodeStore,
    Q: CleanupScheduler,
{
    pub store: S,
    pub scheduler: Q,
    pub clock: SharedClock,
    pub ttl: Duration,
    pub retry: RetryPolicy,
}

impl<S, Q> IssueCodeUseCase<S, Q>
where
    S: CodeStore,
    Q: CleanupScheduler,
{
    /// Persist a fresh code and arm its cleanup as one unit: if the cleanup
    /// cannot be scheduled the insert is rolled back and nothing is issued.
    /// Only admins may issue.
    pub async fn execute(&self, issuer: &Identity) -> Result<IssuedCode, GateError> {
        if !issuer.admin {
            return Err(GateError::Forbidden);
        }
        let code = AccessCode {
            id: self.store.allocate_id(),
            created_at: self.clock.now(),
            created_by_email: issuer.email.clone(),
            created_by_admin: issuer.admin,
            used: false,
        };
        let delay = self
            .ttl
            .to_std()
            .map_err(|e| GateError::Internal(anyhow::Error::new(e).context("negative code TTL")))?;

        with_retry(&self.retry, || {
            let code = code.clone();
            let scheduler = self.scheduler.clone();
            self.store.transact(move |txn| {
                Box::pin(async move {
                    txn.put(&code).await?;
                    scheduler.schedule_cleanup(&code.id, delay)?;
                    Ok::<_, GateError>(())
                })
            })
        })
        .await?;

        info!(code_id = %code.id, issuer = %issuer.email, "access code issued");
        Ok(IssuedCode {
            share_path: format!("/?code={}", code.id),
            id: code.id,
        })
    }
}
