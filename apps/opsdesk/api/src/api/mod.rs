//! API route modules

pub mod health;
pub mod opsdesk;
pub mod recall;

use axum::Router;

use crate::state::AppState;

/// Build the versioned API router with health endpoints merged in
pub fn router(state: &AppState) -> Router {
    Router::new()
        .nest("/api/v1/opsdesk", opsdesk::router(state))
        .nest("/api/v1/recall", recall::router(state))
        .merge(health::router(state.clone()))
}
