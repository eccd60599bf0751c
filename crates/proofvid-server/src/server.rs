//! ProofVid HTTP Server

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use proofvid::store::{SqliteStore, Store, StoreError};
use proofvid::Registry;

use crate::config::ServeConfig;
use crate::handlers::{self, AppState};

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to open certificate store: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Largest request body the API reads.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Create and configure the Axum router
///
/// Any origin may call the API.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Registry operations
        .route("/api/register", post(handlers::register))
        .route("/api/verify/:hash", get(handlers::verify))
        .route("/api/certificate/:certificate_id", get(handlers::get_certificate))
        .route("/api/stats", get(handlers::stats))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the shared state for a store.
pub fn app_state(store: Arc<dyn Store>, config: &ServeConfig) -> Arc<AppState> {
    Arc::new(AppState {
        registry: Registry::new(store, config.registry_config()),
    })
}

/// Run the HTTP server
pub async fn run(config: ServeConfig) -> Result<(), ServerError> {
    tracing::info!(path = %config.database.display(), "Opening certificate store");
    let store = SqliteStore::open_with(&config.database, &config.store_config())?;

    let app = create_router(app_state(Arc::new(store), &config));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("ProofVid registry listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM or SIGINT signal
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C signal"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received SIGTERM signal");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Starting graceful shutdown...");
}
