//! Server wiring for the co-working booking API.
//!
//! Reads [`Config`], picks a storage backend and serves the router from
//! `cowork-web` until a shutdown signal arrives.

pub mod config;
pub mod telemetry;

pub use config::{Config, ConfigError};

use cowork_core::BookingError;
use cowork_core::memory::InMemoryStore;
use cowork_postgres::PostgresStore;
use cowork_web::{AppState, TokenIssuer, build_router};
use thiserror::Error;

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad environment
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection or migration failed
    #[error("Database unavailable: {0}")]
    Database(#[from] BookingError),

    /// Token lifetime out of range
    #[error("JWT_EXPIRE_SECS is out of range")]
    TokenTtl,

    /// Listener or server I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build application state over the configured backend.
///
/// Connects and migrates PostgreSQL when a database is configured; otherwise
/// everything lives in memory.
///
/// # Errors
///
/// Returns [`ServerError::Database`] if PostgreSQL cannot be reached or
/// migrated, or [`ServerError::TokenTtl`] for an unrepresentable lifetime.
pub async fn build_state(config: &Config) -> Result<AppState, ServerError> {
    let ttl = chrono::Duration::from_std(config.auth.token_ttl).map_err(|_| ServerError::TokenTtl)?;
    let tokens = TokenIssuer::new(config.auth.jwt_secret.as_bytes(), ttl);
    if config.auth.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    let state = match &config.database {
        Some(database) => {
            let store = PostgresStore::connect_with_timeout(
                &database.url,
                database.max_connections,
                database.connect_timeout,
            )
            .await?;
            store.migrate().await?;
            tracing::info!(max_connections = database.max_connections, "Using PostgreSQL store");
            let store = std::sync::Arc::new(store);
            AppState::new(store.clone(), store.clone(), store, tokens, config.reservation_quota)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; data is kept in memory only");
            let store = std::sync::Arc::new(InMemoryStore::new());
            AppState::new(store.clone(), store.clone(), store, tokens, config.reservation_quota)
        }
    };
    Ok(state)
}

/// Serve the API until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError`] if state cannot be built or the listener fails.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let app = build_router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, quota = config.reservation_quota, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
