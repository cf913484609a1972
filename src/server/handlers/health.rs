use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.rag.store();
    let documents = match store.count().await {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::warn!("Health check could not count documents: {}", err);
            None
        }
    };

    let generator = state.rag.generator();
    let reachable = generator.health_check().await.unwrap_or(false);

    Json(json!({
        "status": "ok",
        "collection": store.collection(),
        "documents": documents,
        "generator": {
            "provider": generator.name(),
            "model": state.config.ollama.model,
            "reachable": reachable,
        }
    }))
}
