use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for recall operations
pub type RecallResult<T> = Result<T, RecallError>;

/// Errors that can occur in the recall domain
#[derive(Debug, Error)]
pub enum RecallError {
    /// Malformed caller input (bad top_k, wrong vector dimension)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding provider could not vectorize the input
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for RecallError {
    fn from(err: reqwest::Error) -> Self {
        RecallError::Embedding(err.to_string())
    }
}

impl IntoResponse for RecallError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RecallError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            RecallError::Embedding(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            RecallError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            RecallError::Internal(_) => (
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
