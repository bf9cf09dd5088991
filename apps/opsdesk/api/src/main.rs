use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_opsdesk::SchemaDescriptor;
use domain_recall::{OpenAiEmbeddings, RecallService};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Initialize the Prometheus recorder before any request is served
    observability::init_metrics();

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // One recall service per process. The vector index it owns starts empty
    // on every boot and is injected into both the recall routes and the
    // pipeline orchestrator; nothing reaches it through a global.
    let recall = Arc::new(RecallService::new(Arc::new(OpenAiEmbeddings::new(
        config.llm.clone(),
    ))));

    let state = AppState {
        config: config.clone(),
        db,
        recall,
        schema: SchemaDescriptor::trading_ops(),
    };

    let app = api::router(&state)
        .route("/metrics", get(observability::metrics_handler))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(middleware::from_fn(observability::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(120)));

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("opsdesk API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down: closing database connection");
    match state.db.close().await {
        Ok(_) => info!("PostgreSQL connection closed successfully"),
        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
    }

    info!("opsdesk API shutdown complete");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
