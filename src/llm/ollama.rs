use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::error::LlmError;
use super::provider::{EmbeddingProvider, GenerationProvider};
use super::types::{EmbedRequest, EmbedResponse, GenerateRequest, GenerateResponse};
use crate::core::config::OllamaConfig;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local Ollama server, used for both generation and embeddings.
#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_status(res: Response) -> Result<Response, LlmError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(LlmError::Status { status, body })
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool, LlmError> {
        let url = format!("{}/api/tags", self.base_url);
        let res = self
            .client
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: model_id,
            prompt,
            stream: false,
        };

        let res = self.client.post(&url).json(&body).send().await?;
        let res = Self::check_status(res).await?;
        let payload: GenerateResponse = res.json().await?;

        Ok(payload.response)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.base_url);
        let body = EmbedRequest {
            model: model_id,
            input: inputs,
        };

        let res = self.client.post(&url).json(&body).send().await?;
        let res = Self::check_status(res).await?;
        let payload: EmbedResponse = res.json().await?;

        if payload.embeddings.len() != inputs.len() {
            return Err(LlmError::EmbeddingCount {
                expected: inputs.len(),
                received: payload.embeddings.len(),
            });
        }
        if let Some(index) = payload.embeddings.iter().position(|e| e.is_empty()) {
            return Err(LlmError::EmptyEmbedding { index });
        }

        Ok(payload.embeddings)
    }
}
