use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use photofind_access_types::identity::IdentityVerifier;
use photofind_access_types::token::SessionCodec;
use photofind_core::clock::SystemClock;
use photofind_core::config::Config;
use photofind_core::tracing::{DEFAULT_DIRECTIVES, init_tracing};
use photofind_gate::config::GateConfig;
use photofind_gate::domain::repository::{Annotator, CodeStore};
use photofind_gate::infra::db::DbCodeStore;
use photofind_gate::infra::memory::MemoryCodeStore;
use photofind_gate::infra::scheduler::spawn_sweeper;
use photofind_gate::infra::vision::{UnconfiguredAnnotator, VisionAnnotator};
use photofind_gate::router::build_router;
use photofind_gate::state::{AccessSettings, AppState};
use photofind_gate_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing(DEFAULT_DIRECTIVES);

    let config = GateConfig::from_env();

    let annotator: Arc<dyn Annotator> = match config.vision_api_key() {
        Some(key) => Arc::new(VisionAnnotator::new(
            config.vision_endpoint.clone(),
            key.to_owned(),
        )),
        None => {
            warn!("VISION_API_KEY not set; /find will fail");
            Arc::new(UnconfiguredAnnotator)
        }
    };

    match config.database_url() {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .expect("failed to connect to database");
            Migrator::up(&db, None)
                .await
                .expect("failed to run migrations");
            serve(&config, DbCodeStore { db }, annotator).await;
        }
        None => {
            warn!("DATABASE_URL not set; access codes are kept in memory");
            serve(&config, MemoryCodeStore::new(), annotator).await;
        }
    }
}

async fn serve<S: CodeStore>(config: &GateConfig, store: S, annotator: Arc<dyn Annotator>) {
    let state = AppState::new(
        store,
        SessionCodec::new(config.secret.as_bytes()),
        IdentityVerifier::new(config.identity_secret.as_bytes()),
        annotator,
        SystemClock::shared(),
        AccessSettings {
            code_ttl: config.code_ttl(),
            retry: config.retry_policy(),
            secure_cookies: config.secure_cookies,
        },
    );

    let sweeper = spawn_sweeper(state.sweep_stale(), config.sweep_interval());

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.gate_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("gate service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
    sweeper.abort();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
