use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::rag::RagError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Collaborator details are logged, never returned to the caller.
impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match &err {
            RagError::EmptyQuestion => ApiError::BadRequest(err.to_string()),
            RagError::InputTooLong { .. } => ApiError::BadRequest(err.to_string()),
            RagError::Retrieval(source) | RagError::Insert(source) => {
                tracing::error!("Vector store failure: {}", source);
                ApiError::ServiceUnavailable("Knowledge base unavailable".to_string())
            }
            RagError::Generation(source) => {
                tracing::error!("Generation failure: {}", source);
                ApiError::BadGateway("Answer generation failed".to_string())
            }
        }
    }
}
