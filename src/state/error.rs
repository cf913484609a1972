use thiserror::Error;

use crate::core::errors::ApiError;
use crate::llm::LlmError;
use crate::rag::StoreError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] ApiError),

    #[error("Failed to initialize vector store: {0}")]
    Store(#[source] StoreError),

    #[error("Failed to initialize Ollama client: {0}")]
    Llm(#[source] LlmError),
}
