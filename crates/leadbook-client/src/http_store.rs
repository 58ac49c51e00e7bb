//! [`LeadStore`] over the HTTP API

use crate::config::ClientConfig;
use async_trait::async_trait;
use leadbook_core::Lead;
use leadbook_store::{LeadStore, StoreError};
use reqwest::Response;

/// Lead store reached through `GET`/`POST /leads`
#[derive(Debug, Clone)]
pub struct HttpLeadStore {
    leads_url: String,
    http: reqwest::Client,
}

impl HttpLeadStore {
    /// Client for the API described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let http = config.http_client().map_err(transport)?;
        Ok(Self {
            leads_url: config.url("leads"),
            http,
        })
    }

    /// Endpoint in use
    #[inline]
    #[must_use]
    pub fn leads_url(&self) -> &str {
        &self.leads_url
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Malformed(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl LeadStore for HttpLeadStore {
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError> {
        let response = self.http.get(&self.leads_url).send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        let response = self
            .http
            .post(&self.leads_url)
            .json(leads)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}
