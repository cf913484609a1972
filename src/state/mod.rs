use std::sync::Arc;

use crate::core::config::{AppConfig, AppPaths, ConfigService};
use crate::llm::{GenerationProvider, OllamaProvider};
use crate::rag::{RagService, SqliteVectorStore, VectorStore};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Collaborators are held behind trait objects so the router can be driven
/// with fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub rag: RagService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Arc<Self> {
        let rag = RagService::new(store, generator, config.ollama.model.clone(), config.rag.clone());
        Arc::new(AppState {
            config: Arc::new(config),
            rag,
        })
    }

    /// Loads configuration and wires the production collaborators:
    /// 1. Ollama client for generation and embeddings
    /// 2. SQLite vector store under the data directory
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone())
            .load_config()
            .map_err(InitializationError::Config)?;

        let ollama = Arc::new(
            OllamaProvider::from_config(&config.ollama).map_err(InitializationError::Llm)?,
        );

        let store = Arc::new(
            SqliteVectorStore::new(
                paths.as_ref(),
                &config.rag.collection,
                ollama.clone(),
                &config.ollama.embedding_model,
            )
            .await
            .map_err(InitializationError::Store)?,
        );

        tracing::info!(
            "Knowledge base at {} (collection '{}'), Ollama at {}",
            paths.db_path.display(),
            config.rag.collection,
            ollama.base_url()
        );

        Ok(Self::new(config, store, ollama))
    }
}
