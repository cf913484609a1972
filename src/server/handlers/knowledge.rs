use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::rag::RagError;
use crate::state::AppState;

pub const ADDED_MESSAGE: &str = "Content added to knowledge base";

#[derive(Debug, Default, Deserialize)]
pub struct AddParams {
    pub text: Option<String>,
}

/// Body of every `/add` reply; callers inspect `status`, the HTTP code is always 200.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AddResponse {
    Success { message: String, id: String },
    Error { message: String },
}

pub async fn add_knowledge(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddParams>,
    body: Option<Json<AddParams>>,
) -> Result<Json<AddResponse>, ApiError> {
    let text = params
        .text
        .or_else(|| body.and_then(|Json(body)| body.text))
        .ok_or_else(|| ApiError::BadRequest("Missing required field 'text'".to_string()))?;

    let response = match state.rag.add_knowledge(&text).await {
        Ok(document) => AddResponse::Success {
            message: ADDED_MESSAGE.to_string(),
            id: document.id,
        },
        Err(err) => {
            tracing::error!("Failed to add content to knowledge base: {}", err);
            AddResponse::Error {
                message: describe_add_error(&err),
            }
        }
    };

    Ok(Json(response))
}

fn describe_add_error(err: &RagError) -> String {
    match err {
        RagError::Insert(source) => {
            format!("Failed to add content to knowledge base: {}", source.summary())
        }
        RagError::InputTooLong { .. } => err.to_string(),
        _ => "Failed to add content to knowledge base".to_string(),
    }
}
