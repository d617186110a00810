//! IntelliCourse Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the generation provider credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "INTELLICOURSE_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Retrieval configuration
    pub rag: RagConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for a process
    ///
    /// Reads the TOML file at `path` (or `INTELLICOURSE_CONFIG`) when given,
    /// then applies environment overrides. Without a file, environment
    /// variables are applied over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        match path {
            Some(path) => Self::from_file(path)?.with_env_override(),
            None => Self::from_env(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // LLM
        if let Some(key) = lookup(API_KEY_ENV) {
            let key = key.trim().to_string();
            self.llm.api_key = (!key.is_empty()).then_some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            self.llm.timeout_secs = Some(parse_value("GEMINI_TIMEOUT_SECS", secs)?);
        }

        // Catalog
        if let Some(path) = lookup("CATALOG_PATH") {
            self.rag.catalog_path = Some(PathBuf::from(path));
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = parse_value("LOG_JSON", json)?;
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Origins allowed to make cross-origin calls
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

/// LLM provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: Option<String>,

    /// Gemini API base URL
    pub base_url: String,

    /// Model name to use
    pub model: String,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds; no timeout when unset
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.1,
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Separator placed between retrieved chunks
    pub context_separator: String,

    /// Optional TOML catalog file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            context_separator: "\n---\n".to_string(),
            catalog_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
