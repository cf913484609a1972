#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use rag_backend::core::config::defaults::default_config;
use rag_backend::core::config::AppConfig;
use rag_backend::llm::{GenerationProvider, LlmError};
use rag_backend::rag::{Document, DocumentMatch, StoreError, VectorStore};

pub fn test_config() -> AppConfig {
    AppConfig::from_value(default_config()).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Lowercased alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Deterministic bag-of-words embedding with 64 buckets.
pub fn word_hash(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; 64];
    for word in words(text) {
        let bucket = word
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        vector[bucket % 64] += 1.0;
    }
    vector
}

/// In-memory store ranking by shared words.
#[derive(Default)]
pub struct MemoryStore {
    pub documents: Mutex<Vec<Document>>,
    pub fail_inserts: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    fn collection(&self) -> &str {
        "docs"
    }

    async fn insert(&self, document: Document) -> Result<(), StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Embedding(LlmError::Request(
                "error sending request for url (http://10.0.0.7:11434/api/embed)".to_string(),
            )));
        }
        self.documents.lock().unwrap().push(document);
        Ok(())
    }

    async fn query_top_k(&self, text: &str, k: usize) -> Result<Vec<DocumentMatch>, StoreError> {
        let query_words = words(text);
        let documents = self.documents.lock().unwrap();
        let mut matches: Vec<DocumentMatch> = documents
            .iter()
            .map(|document| {
                let shared = words(&document.text)
                    .iter()
                    .filter(|w| query_words.contains(w))
                    .count();
                DocumentMatch {
                    document: document.clone(),
                    score: shared as f32,
                }
            })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        matches.truncate(k);
        Ok(matches)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.documents.lock().unwrap().len())
    }
}

/// Store whose backing database is gone.
pub struct UnavailableStore;

#[async_trait]
impl VectorStore for UnavailableStore {
    fn collection(&self) -> &str {
        "docs"
    }

    async fn insert(&self, _document: Document) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn query_top_k(&self, _text: &str, _k: usize) -> Result<Vec<DocumentMatch>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

/// Records every prompt and answers with a fixed reply.
#[derive(Default)]
pub struct RecordingGenerator {
    pub prompts: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    async fn health_check(&self) -> Result<bool, LlmError> {
        Ok(!self.fail)
    }

    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((model_id.to_string(), prompt.to_string()));
        if self.fail {
            return Err(LlmError::Status {
                status: 500,
                body: "CUDA out of memory at /srv/models/tinyllama".to_string(),
            });
        }
        Ok("The sky is blue.".to_string())
    }
}

/// Requests received by the fake Ollama server, as `(path, body)`.
pub type OllamaLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Minimal Ollama stand-in: `/api/generate` echoes the prompt, `/api/embed` hashes words.
pub async fn spawn_fake_ollama() -> (String, OllamaLog) {
    let log: OllamaLog = Arc::new(Mutex::new(Vec::new()));

    let generate_log = log.clone();
    let embed_log = log.clone();
    let app = Router::new()
        .route("/api/tags", get(|| async { Json(json!({ "models": [] })) }))
        .route(
            "/api/generate",
            post(move |Json(body): Json<Value>| {
                let log = generate_log.clone();
                async move {
                    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
                    log.lock().unwrap().push(("/api/generate".to_string(), body));
                    Json(json!({ "response": format!("echo: {}", prompt), "done": true }))
                }
            }),
        )
        .route(
            "/api/embed",
            post(move |Json(body): Json<Value>| {
                let log = embed_log.clone();
                async move {
                    let embeddings: Vec<Vec<f32>> = body["input"]
                        .as_array()
                        .map(|inputs| {
                            inputs
                                .iter()
                                .map(|input| word_hash(input.as_str().unwrap_or_default()))
                                .collect()
                        })
                        .unwrap_or_default();
                    log.lock().unwrap().push(("/api/embed".to_string(), body));
                    Json(json!({ "model": "all-minilm", "embeddings": embeddings }))
                }
            }),
        );

    (spawn(app).await, log)
}
