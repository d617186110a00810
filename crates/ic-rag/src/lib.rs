//! IntelliCourse RAG - Retrieval-Augmented Generation over the course catalog
//!
//! This crate implements the two-step answer pipeline:
//! - Keyword retrieval of matching catalog chunks
//! - A single generation call to the model provider with the retrieved context
//!
//! Every failure on the generation side is folded into one of three fixed
//! user-facing messages; the provider's own error text never reaches callers.

use ic_core::{Catalog, GenerationRequest, LlmClient, LlmConfig, RagConfig};
use std::sync::Arc;
use thiserror::Error;

pub mod llm;
pub mod prompt;
pub mod retriever;

pub use llm::{create_llm_client, init_llm_client, GeminiClient};
pub use prompt::PromptBuilder;
pub use retriever::{KeywordRetriever, RetrievedContext, SearchTerms};

/// System instruction sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = "You are IntelliCourse, an AI assistant for Northwood \
University's course catalog. Answer questions only using the provided course context. \
Be concise, direct, and accurate.";

pub const NO_CONTEXT_MESSAGE: &str =
    "I'm sorry, I couldn't find any relevant course information in the catalog.";
pub const CLIENT_UNAVAILABLE_MESSAGE: &str =
    "Gemini API client not initialized. Cannot generate AI answer.";
pub const PROVIDER_ERROR_MESSAGE: &str =
    "An internal error occurred while generating the answer.";

// ============================================================================
// Answer Errors
// ============================================================================

/// Reasons an answer could not be generated by the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("no catalog chunk matched the question")]
    NoContext,

    #[error("generation client is not initialized")]
    ClientUnavailable,

    #[error("generation provider failed: {detail}")]
    Provider { detail: String },
}

impl AnswerError {
    /// Fixed message shown to the caller
    pub fn user_message(&self) -> &'static str {
        match self {
            AnswerError::NoContext => NO_CONTEXT_MESSAGE,
            AnswerError::ClientUnavailable => CLIENT_UNAVAILABLE_MESSAGE,
            AnswerError::Provider { .. } => PROVIDER_ERROR_MESSAGE,
        }
    }
}

// ============================================================================
// Course Assistant
// ============================================================================

/// Generator adapter over a read-only catalog and an optional model client
pub struct CourseAssistant {
    retriever: KeywordRetriever,
    client: Option<Arc<dyn LlmClient>>,
    model: String,
    temperature: f32,
}

impl CourseAssistant {
    /// Create an assistant with default generation settings
    pub fn new(catalog: Catalog, client: Option<Arc<dyn LlmClient>>) -> Self {
        Self::from_config(
            catalog,
            client,
            &LlmConfig::default(),
            &RagConfig::default(),
        )
    }

    /// Create an assistant with settings taken from configuration
    pub fn from_config(
        catalog: Catalog,
        client: Option<Arc<dyn LlmClient>>,
        llm: &LlmConfig,
        rag: &RagConfig,
    ) -> Self {
        Self {
            retriever: KeywordRetriever::new(catalog, rag.context_separator.clone()),
            client,
            model: llm.model.clone(),
            temperature: llm.temperature,
        }
    }

    /// Whether a generation client is available
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn catalog(&self) -> &Catalog {
        self.retriever.catalog()
    }

    /// Retrieval step only
    pub fn retrieve(&self, question: &str) -> RetrievedContext<'_> {
        self.retriever.retrieve(question)
    }

    /// Answer a question, mapping every failure to its fixed message
    pub async fn answer(&self, question: &str) -> String {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(err) => err.user_message().to_string(),
        }
    }

    /// Answer a question, keeping the failure kind structured
    pub async fn try_answer(&self, question: &str) -> Result<String, AnswerError> {
        let context = self.retrieve(question);
        tracing::debug!(chunks = context.chunks().len(), "Context retrieved");

        if context.is_empty() {
            return Err(AnswerError::NoContext);
        }

        self.generate(question, context.text()).await
    }

    /// Generate an answer from already retrieved, non-empty context
    pub async fn generate(&self, question: &str, context: &str) -> Result<String, AnswerError> {
        let Some(client) = self.client.as_ref() else {
            tracing::warn!("Generation requested but no model client is configured");
            return Err(AnswerError::ClientUnavailable);
        };

        let prompt = PromptBuilder::new()
            .context(context)
            .question(question)
            .build();

        let request = GenerationRequest::new(self.model.as_str(), prompt)
            .with_system_instruction(SYSTEM_INSTRUCTION)
            .with_temperature(self.temperature);

        tracing::info!(
            provider = client.name(),
            prompt_chars = request.prompt.len(),
            "Calling model provider"
        );

        match client.generate(&request).await {
            Ok(answer) => {
                tracing::info!(answer_chars = answer.len(), "Model response received");
                Ok(answer)
            }
            Err(e) => {
                tracing::error!(provider = client.name(), error = %e, "Model provider error");
                Err(AnswerError::Provider {
                    detail: e.to_string(),
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
