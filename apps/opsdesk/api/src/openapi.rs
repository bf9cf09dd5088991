//! Combined OpenAPI document for all mounted domains

use axum::Json;
use utoipa::OpenApi;

/// Root API documentation; domain docs are nested under their mount points
#[derive(OpenApi)]
#[openapi(info(
    title = "opsdesk API",
    description = "LLM-assisted operations Q&A: request pipeline and semantic recall"
))]
pub struct ApiDoc;

/// Build the full document with each domain nested at its mount path
pub fn document() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
        .nest("/api/v1/opsdesk", domain_opsdesk::handlers::ApiDoc::openapi())
        .nest("/api/v1/recall", domain_recall::handlers::ApiDoc::openapi())
}

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(document())
}
