//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `VectorStore`: the knowledge base abstraction, with `SqliteVectorStore` as its implementation
//! - `RagService`: answers questions from the nearest stored document and adds new documents
//! - `build_prompt`: the fixed template combining context and question

mod error;
mod prompt;
mod service;
mod sqlite;
mod store;

pub use error::{RagError, StoreError};
pub use prompt::build_prompt;
pub use service::{Answer, RagService};
pub use sqlite::SqliteVectorStore;
pub use store::{Document, DocumentMatch, VectorStore};
