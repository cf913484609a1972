use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::state::AppState;

/// `q` may arrive in the query string or in a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

pub async fn query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
    body: Option<Json<QueryParams>>,
) -> Result<Json<QueryResponse>, ApiError> {
    let question = params
        .q
        .or_else(|| body.and_then(|Json(body)| body.q))
        .ok_or_else(|| ApiError::BadRequest("Missing required field 'q'".to_string()))?;

    let answer = state.rag.answer(&question).await?;
    Ok(Json(QueryResponse {
        answer: answer.text,
    }))
}
