//! Semantic document recall routes

use std::sync::Arc;

use axum::Router;
use domain_recall::{handlers, RecallState};

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(RecallState::new(Arc::clone(&state.recall)))
}
