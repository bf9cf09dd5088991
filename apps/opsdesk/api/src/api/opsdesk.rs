//! Operations request pipeline routes

use std::sync::Arc;

use axum::Router;
use domain_opsdesk::{
    handlers, OpenAiChatClient, OpsOrchestrator, OpsState, PgOpsRepository,
};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgOpsRepository::new(state.db.clone());
    let completion = Arc::new(OpenAiChatClient::new(state.config.llm.clone()));

    // The orchestrator gets the same recall service instance as the recall
    // routes; both see one index
    let orchestrator = OpsOrchestrator::new(
        repository,
        completion,
        Arc::clone(&state.recall),
        state.schema.clone(),
    );

    handlers::router(OpsState::new(orchestrator))
}
