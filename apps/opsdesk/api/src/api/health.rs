//! Health endpoints
//!
//! - `/health`: liveness check with service name/version
//! - `/ready`: readiness check backed by a database round trip

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    match database::postgres::check_health(&state.db).await {
        Ok(_) => Ok(Json(json!({"status": "ready"}))),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
