//! HTTP handlers for the recall domain

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use utoipa::OpenApi;
use validator::Validate;

use crate::error::{RecallError, RecallResult};
use crate::models::{AddDocument, SearchDocuments, SearchHit};
use crate::service::RecallService;

/// Shared state for recall handlers
#[derive(Clone)]
pub struct RecallState {
    pub service: Arc<RecallService>,
}

impl RecallState {
    pub fn new(service: Arc<RecallService>) -> Self {
        Self { service }
    }
}

/// OpenAPI documentation for the recall API
#[derive(OpenApi)]
#[openapi(
    paths(add_document, search_documents),
    components(schemas(AddDocument, SearchDocuments, SearchHit)),
    tags(
        (name = "recall", description = "Semantic document recall endpoints")
    )
)]
pub struct ApiDoc;

/// Create the recall router
pub fn router(state: RecallState) -> Router {
    Router::new()
        .route("/documents", post(add_document))
        .route("/search", post(search_documents))
        .with_state(state)
}

/// Index a document for later semantic retrieval
#[utoipa::path(
    post,
    path = "/documents",
    tag = "recall",
    request_body = AddDocument,
    responses(
        (status = 201, description = "Document indexed"),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Embedding provider failure")
    )
)]
async fn add_document(
    State(state): State<RecallState>,
    Json(request): Json<AddDocument>,
) -> RecallResult<StatusCode> {
    request
        .validate()
        .map_err(|e| RecallError::InvalidArgument(e.to_string()))?;

    state
        .service
        .add_document(&request.identifier, &request.content)
        .await?;

    Ok(StatusCode::CREATED)
}

/// Search for documents similar to a query
#[utoipa::path(
    post,
    path = "/search",
    tag = "recall",
    request_body = SearchDocuments,
    responses(
        (status = 200, description = "Nearest documents", body = Vec<SearchHit>),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Embedding provider failure")
    )
)]
async fn search_documents(
    State(state): State<RecallState>,
    Json(request): Json<SearchDocuments>,
) -> RecallResult<Json<Vec<SearchHit>>> {
    request
        .validate()
        .map_err(|e| RecallError::InvalidArgument(e.to_string()))?;

    let hits = state
        .service
        .search(&request.query, request.top_k)
        .await?;

    Ok(Json(hits))
}
