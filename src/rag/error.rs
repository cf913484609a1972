use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("embedding failed: {0}")]
    Embedding(#[source] LlmError),

    #[error("embedding dimension mismatch: stored {stored}, query {query}")]
    DimensionMismatch { stored: usize, query: usize },
}

impl StoreError {
    /// Category shown to callers in place of the underlying fault.
    pub fn summary(&self) -> &'static str {
        match self {
            StoreError::Database(_) => "knowledge base storage unavailable",
            StoreError::Embedding(_) => "embedding service unavailable",
            StoreError::DimensionMismatch { .. } => "embedding model does not match stored documents",
        }
    }
}

#[derive(Debug, Error)]
pub enum RagError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("input is {length} characters, limit is {limit}")]
    InputTooLong { length: usize, limit: usize },

    #[error("retrieval failed: {0}")]
    Retrieval(#[source] StoreError),

    #[error("insert failed: {0}")]
    Insert(#[source] StoreError),

    #[error("generation failed: {0}")]
    Generation(#[source] LlmError),
}
