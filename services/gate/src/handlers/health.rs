use axum::{extract::State, http::StatusCode};

use crate::domain::repository::CodeStore;
use crate::state::AppState;

/// Handler for `GET /readyz`: ready once the code store answers.
pub async fn readyz<S: CodeStore>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "code store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
