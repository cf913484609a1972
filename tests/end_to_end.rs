mod common;

use std::sync::Arc;

use serde_json::Value;

use common::{spawn, spawn_fake_ollama, test_config};
use rag_backend::llm::OllamaProvider;
use rag_backend::rag::SqliteVectorStore;
use rag_backend::server::router::router;
use rag_backend::state::AppState;

/// Production store and client, with only the Ollama server faked.
#[tokio::test]
async fn sky_scenario_through_sqlite_and_ollama() {
    let dir = tempfile::tempdir().unwrap();
    let (ollama_url, ollama_log) = spawn_fake_ollama().await;
    let ollama = Arc::new(OllamaProvider::new(ollama_url));
    let config = test_config();

    let store = Arc::new(
        SqliteVectorStore::with_path(
            dir.path().join("rag.db"),
            &config.rag.collection,
            ollama.clone(),
            &config.ollama.embedding_model,
        )
        .await
        .unwrap(),
    );
    let base = spawn(router(AppState::new(config, store, ollama))).await;
    let client = reqwest::Client::new();

    for text in ["The sky is blue.", "Rust compiles to native code."] {
        let added: Value = client
            .post(format!("{}/add", base))
            .query(&[("text", text)])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(added["status"], "success");
    }

    let body: Value = client
        .post(format!("{}/query", base))
        .query(&[("q", "What color is the sky?")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let answer = body["answer"].as_str().unwrap();
    assert!(answer.starts_with("echo: Context:\nThe sky is blue.\n\n"));
    assert!(answer.contains("Question: What color is the sky?"));

    let log = ollama_log.lock().unwrap();
    let generate_calls: Vec<_> = log
        .iter()
        .filter(|(path, _)| path == "/api/generate")
        .collect();
    assert_eq!(generate_calls.len(), 1);
    assert_eq!(generate_calls[0].1["model"], "tinyllama");
}
