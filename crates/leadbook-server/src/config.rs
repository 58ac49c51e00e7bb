//! Server configuration
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! environment variables, then command-line flags (applied by the binary
//! through the `with_*` builders).

use leadbook_compose::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8888";
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://leadbook.db";
/// Default request body limit (4 MiB)
pub const DEFAULT_BODY_LIMIT: u64 = 4 * 1024 * 1024;

/// Environment variable overriding [`ServerConfig::database_url`]
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable overriding [`ServerConfig::bind`]
pub const ENV_BIND: &str = "LEADBOOK_BIND";
/// Environment variables holding the generator API key, first match wins
pub const ENV_API_KEYS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ServerConfig`]
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value
    #[error("invalid {key} {value:?}: {reason}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Offending value
        value: String,
        /// What was wrong
        reason: String,
    },

    /// Log subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// sqlx SQLite URL
    pub database_url: String,
    /// Pool size for file databases
    pub max_connections: u32,
    /// Largest accepted request body in bytes
    pub body_limit: u64,
    /// Message generator settings
    pub generator: GeminiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: leadbook_store::DEFAULT_MAX_CONNECTIONS,
            body_limit: DEFAULT_BODY_LIMIT,
            generator: GeminiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw, path)
    }

    /// Defaults or `path`, then the process environment, validated
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`)
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = parse_bind(&bind)?;
        }
        if let Some(key) = ENV_API_KEYS.iter().find_map(|name| lookup(*name)) {
            self.generator.api_key = key;
        }
        Ok(self)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database_url",
                value: self.database_url.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.body_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "body_limit",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Set the listen address
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Set the database URL
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the pool size
    #[must_use]
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the body limit
    #[must_use]
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Set the generator settings
    #[must_use]
    pub fn with_generator(mut self, generator: GeminiConfig) -> Self {
        self.generator = generator;
        self
    }
}

/// Parse a listen address
pub fn parse_bind(raw: &str) -> Result<SocketAddr, ConfigError> {
    SocketAddr::from_str(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key: "bind",
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
