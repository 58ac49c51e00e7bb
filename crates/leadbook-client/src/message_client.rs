//! [`MessageGenerator`] over `POST /generate-message`

use crate::config::ClientConfig;
use async_trait::async_trait;
use leadbook_compose::{GenerateError, MessageGenerator, MessageRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeneratedMessage {
    #[serde(default)]
    message: String,
}

/// Asks the API to draft a message; the key stays server-side
#[derive(Debug, Clone)]
pub struct MessageClient {
    url: String,
    http: reqwest::Client,
}

impl MessageClient {
    /// Client for the API described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            url: config.url("generate-message"),
            http: config.http_client()?,
        })
    }
}

#[async_trait]
impl MessageGenerator for MessageClient {
    async fn generate(&self, request: &MessageRequest) -> Result<String, GenerateError> {
        request.validate()?;
        let response = self.http.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Provider {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: GeneratedMessage = response
            .json()
            .await
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;
        let message = body.message.trim();
        if message.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(message.to_string())
    }
}
