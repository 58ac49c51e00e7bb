//! Leadbook Server - HTTP API over the lead store
//!
//! Provides:
//! - [`routes`]: warp filters for `/leads` and `/generate-message`
//! - [`ServerConfig`]: layered configuration (defaults, TOML, env, flags)
//! - [`AppState`]: the store and generator behind the handlers
//! - [`bind`]: listen with graceful shutdown

#![warn(unreachable_pub)]

pub mod config;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use logging::{init_logging, LogFormat};
pub use routes::routes;
pub use state::AppState;

use leadbook_compose::{GeminiGenerator, GenerateError};
use leadbook_store::{SqliteLeadStore, StoreError};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Startup failures
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Store could not be opened
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// Generator client could not be built
    #[error("generator: {0}")]
    Generator(#[from] GenerateError),

    /// Listen address unavailable
    #[error("bind: {0}")]
    Bind(#[from] warp::Error),
}

/// Open the configured store and generator
pub async fn connect_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let store = SqliteLeadStore::connect_with(&config.database_url, config.max_connections).await?;
    if !config.generator.has_credentials() {
        tracing::warn!("no API key configured; /generate-message will fail until one is set");
    }
    let generator = GeminiGenerator::new(config.generator.clone())?;
    Ok(AppState::new(Arc::new(store), Arc::new(generator)).with_body_limit(config.body_limit))
}

/// Bind `addr` and return the bound address with the server future.
///
/// The future completes once `shutdown` resolves and in-flight requests
/// have finished.
pub fn bind<F>(
    state: AppState,
    addr: SocketAddr,
    shutdown: F,
) -> Result<(SocketAddr, impl Future<Output = ()>), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (bound, server) =
        warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, shutdown)?;
    tracing::info!(addr = %bound, "leadbook server listening");
    Ok((bound, server))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
