use std::sync::Arc;

use uuid::Uuid;

use super::error::RagError;
use super::prompt::build_prompt;
use super::store::{Document, DocumentMatch, VectorStore};
use crate::core::config::{EmptyContextPolicy, RagConfig};
use crate::llm::GenerationProvider;

/// Result of answering a question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// The retrieved document, or `None` when the knowledge base had no match.
    pub context: Option<DocumentMatch>,
}

/// Sequences retrieval and generation for `/query`, and inserts for `/add`.
///
/// Holds no mutable state; both collaborators are injected so tests can swap in fakes.
#[derive(Clone)]
pub struct RagService {
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn GenerationProvider>,
    model: String,
    settings: RagConfig,
}

impl RagService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerationProvider>,
        model: impl Into<String>,
        settings: RagConfig,
    ) -> Self {
        Self {
            store,
            generator,
            model: model.into(),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    pub fn generator(&self) -> &Arc<dyn GenerationProvider> {
        &self.generator
    }

    pub async fn answer(&self, question: &str) -> Result<Answer, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }
        self.check_length(question)?;

        tracing::info!("Received query: {}", question);

        let matches = self
            .store
            .query_top_k(question, self.settings.top_k)
            .await
            .map_err(RagError::Retrieval)?;
        tracing::info!(
            "Retrieval results: {:?}",
            matches
                .iter()
                .map(|m| (m.document.id.as_str(), m.score))
                .collect::<Vec<_>>()
        );

        let top = matches.into_iter().next();
        if top.is_none() && self.settings.empty_context == EmptyContextPolicy::NoAnswer {
            tracing::info!("No context found; skipping generation");
            return Ok(Answer {
                text: self.settings.no_context_answer.clone(),
                context: None,
            });
        }

        let context = top.as_ref().map(|m| m.document.text.as_str()).unwrap_or("");
        tracing::info!("Context passed to model: {}", context);

        let prompt = build_prompt(context, question);
        let text = self
            .generator
            .generate(&self.model, &prompt)
            .await
            .map_err(RagError::Generation)?;

        Ok(Answer { text, context: top })
    }

    /// Stores `text` under a fresh UUID and returns the new document.
    pub async fn add_knowledge(&self, text: &str) -> Result<Document, RagError> {
        self.check_length(text)?;

        let document = Document {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        };

        self.store
            .insert(document.clone())
            .await
            .map_err(RagError::Insert)?;

        tracing::info!(
            "Added document {} to '{}' ({} chars)",
            document.id,
            self.store.collection(),
            document.text.chars().count()
        );
        Ok(document)
    }

    fn check_length(&self, input: &str) -> Result<(), RagError> {
        let length = input.chars().count();
        if length > self.settings.max_input_length {
            return Err(RagError::InputTooLong {
                length,
                limit: self.settings.max_input_length,
            });
        }
        Ok(())
    }
}
