use chrono::Duration;
use tracing::info;

use photofind_access_types::token::SessionCodec;
use photofind_core::clock::{Clock, SharedClock};
use photofind_core::retry::{RetryPolicy, with_retry};

use crate::domain::repository::{CodeStore, CodeTxn};
use crate::error::GateError;

/// Exchange an unused, unexpired access code for a session token.
///
/// Check and latch happen in one store transaction, so concurrent callers
/// presenting the same code get exactly one success. A loser either reads the
/// latch directly or conflicts, retries, and then reads it.
pub struct RedeemCodeUseCase<S: CodeStore> {
    pub store: S,
    pub codec: SessionCodec,
    pub clock: SharedClock,
    pub ttl: Duration,
    pub retry: RetryPolicy,
}

impl<S: CodeStore> RedeemCodeUseCase<S> {
    pub async fn execute(&self, id: &str) -> Result<String, GateError> {
        if id.is_empty() {
            return Err(GateError::NotFound);
        }

        let token = with_retry(&self.retry, || {
            let id = id.to_owned();
            let codec = self.codec.clone();
            let clock = self.clock.clone();
            let ttl = self.ttl;
            self.store.transact(move |txn| {
                Box::pin(async move {
                    let mut code = txn.get(&id).await?.ok_or(GateError::NotFound)?;
                    if code.used {
                        return Err(GateError::AlreadyUsed);
                    }
                    if code.is_expired(clock.now(), ttl) {
                        return Err(GateError::Expired);
                    }
                    code.used = true;
                    txn.put(&code).await?;
                    // Signed before commit: a signing failure leaves the code unused.
                    let token = codec.encode(&id)?;
                    Ok::<_, GateError>(token)
                })
            })
        })
        .await?;

        info!(code_id = %id, "access code redeemed");
        Ok(token)
    }
}
