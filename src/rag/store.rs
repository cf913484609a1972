//! VectorStore trait: the knowledge base as seen by the request handlers.
//!
//! Implementations own embedding and persistence; callers only deal in text.
//! The primary implementation is `SqliteVectorStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// A stored unit of knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, assigned once at insertion.
    pub id: String,
    pub text: String,
}

/// A document returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMatch {
    pub document: Document,
    /// Cosine similarity to the query (higher = better).
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Embed and persist a document.
    async fn insert(&self, document: Document) -> Result<(), StoreError>;

    /// The `k` documents most similar to `text`, best first. Empty when nothing is stored.
    async fn query_top_k(&self, text: &str, k: usize) -> Result<Vec<DocumentMatch>, StoreError>;

    /// Number of documents in the collection.
    async fn count(&self) -> Result<usize, StoreError>;
}
