use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use photofind_core::health::healthz;
use photofind_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::domain::repository::CodeStore;
use crate::domain::types::MAX_UPLOAD_BYTES;
use crate::handlers::{
    find::find,
    health::readyz,
    index::index,
    share::share,
};
use crate::state::AppState;

pub fn build_router<S: CodeStore>(state: AppState<S>) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<S>))
        // Access
        .route("/", get(index::<S>))
        .route("/share", post(share::<S>))
        // Gated
        .route(
            "/find",
            post(find::<S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
