//! Application state management

use ic_core::config::AppConfig;
use ic_core::{Catalog, LlmClient, Result};
use ic_rag::{init_llm_client, CourseAssistant};
use std::sync::Arc;

/// Application state shared across handlers
///
/// Built once at startup and read-only afterwards.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Retrieval and generation pipeline
    pub assistant: Arc<CourseAssistant>,
}

impl AppState {
    /// Create state from an already constructed assistant
    pub fn new(config: AppConfig, assistant: CourseAssistant) -> Self {
        Self {
            config,
            assistant: Arc::new(assistant),
        }
    }

    /// Create state with an explicit catalog and client
    pub fn with_parts(
        config: AppConfig,
        catalog: Catalog,
        client: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let assistant = CourseAssistant::from_config(catalog, client, &config.llm, &config.rag);
        Self::new(config, assistant)
    }

    /// Load the catalog and model client described by `config`
    ///
    /// Only a broken catalog file is fatal; a missing or unusable model
    /// client leaves the service running in degraded mode.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let catalog = Catalog::load(&config.rag)?;
        tracing::info!(chunks = catalog.len(), "Course catalog loaded");

        let client = init_llm_client(&config.llm);
        Ok(Self::with_parts(config, catalog, client))
    }
}
