use serde_json::{json, Value};

pub const DEFAULT_NO_CONTEXT_ANSWER: &str =
    "I could not find any relevant information in the knowledge base.";

pub fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:8000".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
        "http://127.0.0.1:8000".to_string(),
    ]
}

/// Baseline configuration; `config.yml` and the environment are layered on top.
pub fn default_config() -> Value {
    json!({
        "server": {
            "host": "127.0.0.1",
            "port": 8000,
            "cors_allowed_origins": default_local_origins(),
        },
        "ollama": {
            "base_url": "http://localhost:11434",
            "model": "tinyllama",
            "embedding_model": "all-minilm",
        },
        "rag": {
            "collection": "docs",
            "top_k": 1,
            "max_input_length": 100_000,
            "empty_context": "generate",
            "no_context_answer": DEFAULT_NO_CONTEXT_ANSWER,
        }
    })
}
