pub mod error;
pub mod ollama;
pub mod provider;
pub mod types;

pub use error::LlmError;
pub use ollama::OllamaProvider;
pub use provider::{EmbeddingProvider, GenerationProvider};
