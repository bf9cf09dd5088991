//! HTTP handlers for the opsdesk domain

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use domain_recall::SearchHit;
use utoipa::OpenApi;
use validator::Validate;

use crate::agent::OpsOrchestrator;
use crate::error::{OpsError, OpsResult};
use crate::models::{ProcessOutcome, ProcessRequest, RequestCategory};
use crate::repository::OpsRepository;

/// Shared state for opsdesk handlers
pub struct OpsState<R: OpsRepository + 'static> {
    pub orchestrator: Arc<OpsOrchestrator<R>>,
}

impl<R: OpsRepository + 'static> Clone for OpsState<R> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}

impl<R: OpsRepository + 'static> OpsState<R> {
    pub fn new(orchestrator: OpsOrchestrator<R>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// OpenAPI documentation for the opsdesk API
#[derive(OpenApi)]
#[openapi(
    paths(process_request),
    components(schemas(ProcessRequest, ProcessOutcome, RequestCategory, SearchHit)),
    tags(
        (name = "opsdesk", description = "Operations request pipeline endpoints")
    )
)]
pub struct ApiDoc;

/// Create the opsdesk router
pub fn router<R: OpsRepository + 'static>(state: OpsState<R>) -> Router {
    Router::new()
        .route("/requests", post(process_request))
        .with_state(state)
}

/// Run an operations request through the pipeline
#[utoipa::path(
    post,
    path = "/requests",
    tag = "opsdesk",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Pipeline outcome: completed or rejected", body = ProcessOutcome),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Completion or embedding service failure"),
        (status = 500, description = "Query execution failure")
    )
)]
async fn process_request<R: OpsRepository + 'static>(
    State(state): State<OpsState<R>>,
    Json(request): Json<ProcessRequest>,
) -> OpsResult<Json<ProcessOutcome>> {
    request
        .validate()
        .map_err(|e| OpsError::InvalidInput(e.to_string()))?;

    let outcome = state.orchestrator.process(&request).await?;
    Ok(Json(outcome))
}
