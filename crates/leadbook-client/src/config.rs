//! Client settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888";

/// Where the API lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// How long a successful save reads as `saved`, in milliseconds
    pub saved_display_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            saved_display_ms: 2_000,
        }
    }
}

impl ClientConfig {
    /// Defaults pointed at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the saved display window
    #[must_use]
    pub fn with_saved_display(mut self, window: Duration) -> Self {
        self.saved_display_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Saved display window
    #[inline]
    #[must_use]
    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }

    /// `{base_url}/{path}`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_cleanly() {
        let config = ClientConfig::new("http://api.test/");
        assert_eq!(config.url("/leads"), "http://api.test/leads");
        assert_eq!(config.url("generate-message"), "http://api.test/generate-message");
    }

    #[test]
    fn durations_round_trip() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_saved_display(Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.saved_display(), Duration::from_millis(250));
    }
}
