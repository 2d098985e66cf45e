//! Survey Intake - field survey collection service
//!
//! Accepts interviewer submissions from field clients and serves them
//! back to authenticated readers.

use axum::extract::FromRef;
use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;
use tokio::signal;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::auth::{AuthGate, CredentialStore, JwtManager};
use crate::config::Config;
use crate::storage::SurveyRepository;

/// Application state shared across handlers.
///
/// Built once before serving and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Survey storage.
    pub repository: SurveyRepository,
    /// Token issuing and verification.
    pub auth_gate: AuthGate,
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth_gate.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    // This is optional and won't fail if .env doesn't exist
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Survey Intake v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    config.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        anyhow::anyhow!("{}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        token_duration_minutes = config.auth.token_duration_minutes,
        "Configuration loaded"
    );

    // Connect to database
    let pool = SqlitePool::connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    // Initialize repository and schema
    let repository = SurveyRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    let stored = repository.count_surveys().await?;
    tracing::info!(stored_surveys = stored, "Database connected and schema initialized");

    // Build authentication components
    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        chrono::Duration::minutes(config.auth.token_duration_minutes),
    );
    let credentials = CredentialStore::new(config.auth.users.clone());

    if credentials.user_count() == 0 {
        tracing::warn!("No reader accounts configured - /api/responses is unreachable");
    } else {
        tracing::info!(users = credentials.user_count(), "Reader accounts loaded");
    }

    let state = AppState {
        repository: repository.clone(),
        auth_gate: AuthGate::new(jwt_manager, credentials),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.pool().close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
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
}
