//! LLM Client implementations
//!
//! Provides the Google Gemini `generateContent` client used for answer
//! generation.

use async_trait::async_trait;
use ic_core::config::API_KEY_ENV;
use ic_core::{ConfigError, GenerationRequest, IcError, LlmClient, LlmConfig, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Gemini Client
// ============================================================================

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl<'a> GeminiRequest<'a> {
    fn from_generation(request: &'a GenerationRequest) -> Self {
        let system_instruction = (!request.system_instruction.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: &request.system_instruction,
            }],
        });

        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: LlmConfig::default().base_url,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired(API_KEY_ENV.to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| IcError::Llm(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GeminiRequest::from_generation(request);

        tracing::debug!(
            model = request.model.as_str(),
            prompt_chars = request.prompt.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| IcError::Llm(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(IcError::Llm(format!("Gemini error ({status}): {error_text}")));
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| IcError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .text()
            .ok_or_else(|| IcError::Llm("No response generated".to_string()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an LLM client from config
pub fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    Ok(Arc::new(GeminiClient::from_config(config)?))
}

/// Create the startup client, degrading to `None` instead of failing
///
/// A missing key or a construction error is logged once here; callers then
/// answer with the client-unavailable message.
pub fn init_llm_client(config: &LlmConfig) -> Option<Arc<dyn LlmClient>> {
    if !config.has_api_key() {
        tracing::warn!(
            "{} not found; model answers are disabled until it is set",
            API_KEY_ENV
        );
        return None;
    }

    match create_llm_client(config) {
        Ok(client) => {
            tracing::info!(model = config.model.as_str(), "Gemini client initialized");
            Some(client)
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not initialize Gemini client");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode, Uri},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Request as seen by the local stub server
    #[derive(Debug, Clone)]
    struct SeenRequest {
        path: String,
        api_key: Option<String>,
        body: Value,
    }

    type Seen = Arc<Mutex<Vec<SeenRequest>>>;

    /// Serve a fixed reply on `/v1beta/models/*` and return its base URL
    async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().route(
            "/v1beta/models/*action",
            post(move |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    recorder.lock().unwrap().push(SeenRequest {
                        path: uri.path().to_string(),
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    (status, Json(reply))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1beta"), seen)
    }

    fn client_for(base_url: &str) -> GeminiClient {
        GeminiClient::from_config(&LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
            timeout_secs: Some(10),
            ..Default::default()
        })
        .unwrap()
    }

    fn sample_request() -> GenerationRequest {
        GenerationRequest::new("gemini-2.5-flash", "CONTEXT:\nCS 101: Intro.")
            .with_system_instruction("Answer from context.")
            .with_temperature(0.1)
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(
            client.endpoint_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = GeminiClient::from_config(&LlmConfig::default())
            .err()
            .expect("missing key should fail");
        assert!(matches!(err, IcError::Config(ConfigError::MissingRequired(_))));

        let blank = LlmConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(GeminiClient::from_config(&blank).is_err());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = LlmConfig {
            api_key: Some("key".to_string()),
            base_url: "http://localhost:9999/v1beta/".to_string(),
            timeout_secs: Some(5),
            ..Default::default()
        };

        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1beta");
        assert_eq!(client.name(), "gemini");
    }

    #[test]
    fn test_init_llm_client_degrades() {
        assert!(init_llm_client(&LlmConfig::default()).is_none());

        let config = LlmConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(init_llm_client(&config).is_some());
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest::new("gemini-2.5-flash", "CONTEXT: x")
            .with_system_instruction("Answer from context.")
            .with_temperature(0.1);

        let body = serde_json::to_value(GeminiRequest::from_generation(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "CONTEXT: x");
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            "Answer from context."
        );
        assert!(body["system_instruction"].get("role").is_none());
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_without_system_instruction() {
        let request = GenerationRequest::new("m", "p");
        let body = serde_json::to_value(GeminiRequest::from_generation(&request)).unwrap();
        assert!(body.get("system_instruction").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "It covers "}, {"text": "programming basics."}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12}
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("It covers programming basics."));
    }

    #[test]
    fn test_response_without_text() {
        let blocked: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(blocked.text().is_none());

        let empty: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (base_url, seen) = spawn_stub(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "It covers "}, {"text": "programming basics."}]
                    }
                }]
            }),
        )
        .await;

        let answer = client_for(&base_url)
            .generate(&sample_request())
            .await
            .unwrap();
        assert_eq!(answer, "It covers programming basics.");

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].path,
            "/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));
        assert_eq!(
            seen[0].body["contents"][0]["parts"][0]["text"],
            "CONTEXT:\nCS 101: Intro."
        );
        assert_eq!(
            seen[0].body["system_instruction"]["parts"][0]["text"],
            "Answer from context."
        );
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let (base_url, _seen) = spawn_stub(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"message": "backend unavailable"}}),
        )
        .await;

        let err = client_for(&base_url)
            .generate(&sample_request())
            .await
            .unwrap_err();

        match err {
            IcError::Llm(msg) => {
                assert!(msg.contains("500"), "unexpected message: {msg}");
                assert!(msg.contains("backend unavailable"));
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_without_text() {
        let (base_url, _seen) = spawn_stub(
            StatusCode::OK,
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
        )
        .await;

        let err = client_for(&base_url)
            .generate(&sample_request())
            .await
            .unwrap_err();

        assert!(matches!(err, IcError::Llm(ref msg) if msg == "No response generated"));
    }
}
