//! Google Gemini `generateContent` client

use crate::error::GenerateError;
use crate::prompt::build_prompt;
use crate::request::{MessageGenerator, MessageRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Public Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini client settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; empty means generation is unavailable
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Base URL, without trailing slash
    pub endpoint: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Defaults with the given key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Whether an API key is present
    #[inline]
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, GenerateError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            Err(GenerateError::EmptyResponse)
        } else {
            Ok(text.to_string())
        }
    }
}

/// [`MessageGenerator`] backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiGenerator {
    /// Build a client; fails only if the HTTP client cannot be constructed
    pub fn new(config: GeminiConfig) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { config, http })
    }

    /// Active settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl MessageGenerator for GeminiGenerator {
    async fn generate(&self, request: &MessageRequest) -> Result<String, GenerateError> {
        if !self.config.has_credentials() {
            return Err(GenerateError::MissingCredentials);
        }
        request.validate()?;

        let prompt = build_prompt(request);
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(model = %self.config.model, company = %request.company, "requesting message from Gemini");
        let response = self.http.post(self.config.url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Gemini request failed");
            return Err(GenerateError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: "hello" }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{"parts": [{"text": "hello"}]}],
                "generationConfig": {"temperature": 0.5}
            })
        );
    }

    #[test]
    fn response_parts_are_joined() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hope "}, {"text": "all is well."}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hope all is well.");
    }

    #[test]
    fn blank_response_is_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert_eq!(response.into_text(), Err(GenerateError::EmptyResponse));
    }

    #[test]
    fn url_includes_model_and_key() {
        let config = GeminiConfig::new("k&y").with_endpoint("http://localhost:9/v1beta/");
        assert_eq!(
            config.url(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent?key=k%26y"
        );
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", GeminiConfig::new("secret"));
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let generator = GeminiGenerator::new(
            GeminiConfig::default().with_endpoint("http://127.0.0.1:1"),
        )
        .unwrap();
        let err = generator
            .generate(&MessageRequest::new("Ada", "Acme"))
            .await
            .unwrap_err();
        assert_eq!(err, GenerateError::MissingCredentials);
    }
}
