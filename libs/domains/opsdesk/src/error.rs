use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_recall::RecallError;
use serde_json::json;
use thiserror::Error;

use crate::models::PipelineStage;

/// Result type for opsdesk operations
pub type OpsResult<T> = Result<T, OpsError>;

/// Failure of a single completion-client call, before the orchestrator
/// attributes it to a pipeline stage
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CompletionError(pub String);

/// Errors that can occur in the opsdesk domain.
///
/// A validation-gate rejection is not represented here: it is an expected
/// termination and lives in `ProcessOutcome::Rejected`.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Malformed caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The classifier produced a label outside the closed category set
    #[error("Unrecognized category: {0:?}")]
    UnrecognizedCategory(String),

    /// The completion service failed during a pipeline stage
    #[error("Completion failed while {stage}: {message}")]
    Completion {
        stage: PipelineStage,
        message: String,
    },

    /// The data store could not execute the synthesized query
    #[error("Query execution failed: {0}")]
    Execution(String),

    /// The recall lookup failed
    #[error("Retrieval failed: {0}")]
    Recall(#[from] RecallError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OpsError {
    /// Attribute a completion-client failure to the stage that issued it
    pub fn completion(stage: PipelineStage, err: CompletionError) -> Self {
        OpsError::Completion {
            stage,
            message: err.0,
        }
    }
}

impl From<database::DatabaseError> for OpsError {
    fn from(err: database::DatabaseError) -> Self {
        OpsError::Execution(err.to_string())
    }
}

impl IntoResponse for OpsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OpsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            OpsError::UnrecognizedCategory(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            OpsError::Completion { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            OpsError::Execution(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            OpsError::Recall(inner) => return inner_response(inner),
            OpsError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

fn inner_response(err: &RecallError) -> Response {
    let status = match err {
        RecallError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        RecallError::Embedding(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = Json(json!({
        "error": format!("Retrieval failed: {}", err),
        "code": status.as_u16()
    }));

    (status, body).into_response()
}
