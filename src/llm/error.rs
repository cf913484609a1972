use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to model server failed: {0}")]
    Request(String),

    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from model server: {0}")]
    Decode(String),

    #[error("model server returned {received} embeddings for {expected} inputs")]
    EmbeddingCount { expected: usize, received: usize },

    #[error("model server returned an empty embedding for input {index}")]
    EmptyEmbedding { index: usize },
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Request(err.to_string())
        }
    }
}
