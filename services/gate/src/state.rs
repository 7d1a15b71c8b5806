use std::sync::Arc;

use axum::extract::FromRef;

use photofind_access_types::identity::IdentityVerifier;
use photofind_access_types::token::SessionCodec;
use photofind_core::clock::SharedClock;
use photofind_core::retry::RetryPolicy;

use crate::domain::repository::{Annotator, CodeStore};
use crate::infra::scheduler::TokioCleanupScheduler;
use crate::usecase::access::CheckAccessUseCase;
use crate::usecase::cleanup::{CleanupCodeUseCase, SweepStaleCodesUseCase};
use crate::usecase::issue::IssueCodeUseCase;
use crate::usecase::redeem::RedeemCodeUseCase;

/// Tunables shared by the access code use cases.
#[derive(Debug, Clone)]
pub struct AccessSettings {
    pub code_ttl: chrono::Duration,
    pub retry: RetryPolicy,
    /// `Secure` attribute on the `access_code` cookie.
    pub secure_cookies: bool,
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState<S: CodeStore> {
    pub store: S,
    pub scheduler: TokioCleanupScheduler<S>,
    pub codec: SessionCodec,
    pub identity: IdentityVerifier,
    pub annotator: Arc<dyn Annotator>,
    pub clock: SharedClock,
    pub settings: AccessSettings,
}

impl<S: CodeStore> AppState<S> {
    pub fn new(
        store: S,
        codec: SessionCodec,
        identity: IdentityVerifier,
        annotator: Arc<dyn Annotator>,
        clock: SharedClock,
        settings: AccessSettings,
    ) -> Self {
        Self {
            scheduler: TokioCleanupScheduler::new(store.clone(), settings.retry),
            store,
            codec,
            identity,
            annotator,
            clock,
            settings,
        }
    }

    pub fn issue_code(&self) -> IssueCodeUseCase<S, TokioCleanupScheduler<S>> {
        IssueCodeUseCase {
            store: self.store.clone(),
            scheduler: self.scheduler.clone(),
            clock: self.clock.clone(),
            ttl: self.settings.code_ttl,
            retry: self.settings.retry,
        }
    }

    pub fn redeem_code(&self) -> RedeemCodeUseCase<S> {
        RedeemCodeUseCase {
            store: self.store.clone(),
            codec: self.codec.clone(),
            clock: self.clock.clone(),
            ttl: self.settings.code_ttl,
            retry: self.settings.retry,
        }
    }

    pub fn check_access(&self) -> CheckAccessUseCase<S> {
        CheckAccessUseCase {
            store: self.store.clone(),
            codec: self.codec.clone(),
        }
    }

    pub fn cleanup(&self) -> CleanupCodeUseCase<S> {
        CleanupCodeUseCase {
            store: self.store.clone(),
            retry: self.settings.retry,
        }
    }

    pub fn sweep_stale(&self) -> SweepStaleCodesUseCase<S> {
        SweepStaleCodesUseCase {
            cleanup: self.cleanup(),
            clock: self.clock.clone(),
            ttl: self.settings.code_ttl,
        }
    }
}

impl<S: CodeStore> FromRef<AppState<S>> for IdentityVerifier {
    fn from_ref(state: &AppState<S>) -> Self {
        state.identity.clone()
    }
}
