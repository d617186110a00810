//! IntelliCourse Core - Domain types, traits, and shared configuration
//!
//! This crate defines the abstractions shared by the rest of the workspace:
//! - The course catalog (fixed, read-only text chunks)
//! - Common error types
//! - The `LlmClient` trait used for answer generation
//! - Configuration management

pub mod catalog;
pub mod config;

pub use catalog::{Catalog, CatalogChunk};
pub use config::{AppConfig, ConfigError, LlmConfig, LoggingConfig, RagConfig, ServerConfig};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for IntelliCourse operations
#[derive(Error, Debug)]
pub enum IcError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IcError>;

// ============================================================================
// Generation
// ============================================================================

/// A single generation call to the external model provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Provider model identifier
    pub model: String,

    /// Prompt text (context plus question)
    pub prompt: String,

    /// Fixed system instruction
    pub system_instruction: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: String::new(),
            temperature: 0.0,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response for a single request
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
