//! Server initialization
//!
//! Contains the main `run()` function that wires the store, adapter and
//! engine together and serves the HTTP API.

use super::config::AppConfig;
use super::loader::load_config;
use anyhow::{Context, Result};
use axum::Router;
use roundtable_core::{DebateEngine, DiscussionBroadcaster, SqliteStore};
use roundtable_llm::AgentClient;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Open the database and build the debate engine.
pub async fn build_engine(config: &AppConfig) -> Result<DebateEngine> {
    let db_path = config.database.resolved_path();
    let store = SqliteStore::from_path(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!(path = %db_path.display(), "Database ready");

    let client = AgentClient::with_timeout(Duration::from_secs(config.engine.http_timeout_secs))
        .context("Failed to build HTTP client")?;

    Ok(DebateEngine::new(
        Arc::new(store),
        Arc::new(client),
        Arc::new(DiscussionBroadcaster::new(config.engine.listener_buffer)),
        config.engine.engine_config(),
    ))
}

/// Full application router
pub fn app(engine: DebateEngine) -> Router {
    Router::new()
        .merge(crate::api::health_routes())
        .merge(crate::api::api_router(engine))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Run the server
pub async fn run() -> Result<()> {
    let config = load_config()?;
    let engine = build_engine(&config).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app(engine.clone()))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!(active = engine.active_count(), "Stopping live debates...");
    if tokio::time::timeout(Duration::from_secs(5), engine.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Debate shutdown timeout, exiting anyway");
    }

    info!("Roundtable shutdown complete");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
