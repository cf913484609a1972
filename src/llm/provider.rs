use async_trait::async_trait;

use super::error::LlmError;

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// provider name (e.g. "ollama")
    fn name(&self) -> &str;

    /// check if the provider is reachable
    async fn health_check(&self) -> Result<bool, LlmError>;

    /// single-shot, non-streaming completion for `prompt`
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// one embedding per input, in input order
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, LlmError>;
}
