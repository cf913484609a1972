//! Retrieval-augmented question answering over a local knowledge base.
//!
//! The crate exposes the building blocks used by the `rag-backend` binary:
//! - `rag`: the vector store, prompt assembly and the `RagService` orchestration
//! - `llm`: Ollama-backed generation and embedding providers
//! - `server`: the axum router and request handlers
//! - `state`: dependency wiring shared by all handlers

pub mod core;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
