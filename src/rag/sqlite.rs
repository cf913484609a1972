//! SQLite-backed vector store implementation.
//!
//! In-process store using SQLite for documents and their embeddings,
//! with brute-force cosine similarity for search. Embeddings come from
//! an `EmbeddingProvider`, so callers only ever pass text.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::error::StoreError;
use super::store::{Document, DocumentMatch, VectorStore};
use crate::core::config::AppPaths;
use crate::llm::{EmbeddingProvider, LlmError};

pub struct SqliteVectorStore {
    pool: SqlitePool,
    collection: String,
    embedder: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
}

impl SqliteVectorStore {
    pub async fn new(
        paths: &AppPaths,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        embedding_model: &str,
    ) -> Result<Self, StoreError> {
        Self::with_path(paths.db_path.clone(), collection, embedder, embedding_model).await
    }

    pub async fn with_path(
        db_path: PathBuf,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        embedding_model: &str,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            collection: collection.to_string(),
            embedder,
            embedding_model: embedding_model.to_string(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                embedding_model TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection
             ON documents(collection, embedding_model)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        let mut embeddings = self
            .embedder
            .embed(&[text.to_string()], &self.embedding_model)
            .await
            .map_err(StoreError::Embedding)?;
        match embeddings.pop() {
            Some(embedding) if !embedding.is_empty() => Ok(embedding),
            Some(_) => Err(StoreError::Embedding(LlmError::EmptyEmbedding { index: 0 })),
            None => Err(StoreError::Embedding(LlmError::EmbeddingCount {
                expected: 1,
                received: 0,
            })),
        }
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn insert(&self, document: Document) -> Result<(), StoreError> {
        let embedding = self.embed_one(&document.text).await?;
        let blob = Self::serialize_embedding(&embedding);

        sqlx::query(
            "INSERT INTO documents (id, collection, content, embedding, embedding_model)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&document.id)
        .bind(&self.collection)
        .bind(&document.text)
        .bind(&blob)
        .bind(&self.embedding_model)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query_top_k(&self, text: &str, k: usize) -> Result<Vec<DocumentMatch>, StoreError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT id, content, embedding
             FROM documents
             WHERE collection = ?1 AND embedding_model = ?2",
        )
        .bind(&self.collection)
        .bind(&self.embedding_model)
        .fetch_all(&self.pool)
        .await?;

        // Nothing stored means nothing to compare against; skip the embedding call.
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embed_one(text).await?;

        let mut scored = Vec::with_capacity(rows.len());
        let mut mismatched = None;
        for row in &rows {
            let embedding_bytes: Vec<u8> = row.get("embedding");
            let stored = Self::deserialize_embedding(&embedding_bytes);
            if stored.len() != query_embedding.len() {
                let id: String = row.get("id");
                tracing::warn!(
                    "Skipping document {}: embedding has {} dimensions, query has {}",
                    id,
                    stored.len(),
                    query_embedding.len()
                );
                if mismatched.is_none() {
                    mismatched = Some(stored.len());
                }
                continue;
            }

            scored.push(DocumentMatch {
                document: Document {
                    id: row.get("id"),
                    text: row.get("content"),
                },
                score: Self::cosine_similarity(&query_embedding, &stored),
            });
        }

        // Only unreadable rows: the embedding model changed shape under the same name.
        if let Some(stored) = mismatched.filter(|_| scored.is_empty()) {
            return Err(StoreError::DimensionMismatch {
                stored,
                query: query_embedding.len(),
            });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1 AND embedding_model = ?2",
        )
        .bind(&self.collection)
        .bind(&self.embedding_model)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as usize)
    }
}
