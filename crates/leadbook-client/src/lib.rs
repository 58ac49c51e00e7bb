//! Leadbook Client - local lead editing with batch saves
//!
//! Provides:
//! - [`LeadSession`]: working/persisted snapshots, save protocol and status
//! - [`HttpLeadStore`]: [`leadbook_store::LeadStore`] over the HTTP API
//! - [`MessageClient`]: [`leadbook_compose::MessageGenerator`] over the HTTP API
//! - [`ClientConfig`]
//!
//! # Save protocol
//!
//! 1. Leads new or changed since the last save are stamped with the current time
//! 2. The complete working set is sent; the store deletes whatever is missing
//! 3. On success both snapshots move to what was sent; on failure nothing moves
//!
//! A save requested while one is running is ignored, not queued.

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod http_store;
pub mod message_client;
pub mod session;

pub use config::ClientConfig;
pub use error::SessionError;
pub use http_store::HttpLeadStore;
pub use message_client::MessageClient;
pub use session::{LeadSession, LoadOutcome, OutboundMessage, SaveOutcome};

use leadbook_store::StoreError;

/// Session over the API at `config.base_url`
pub fn connect(config: &ClientConfig) -> Result<LeadSession<HttpLeadStore>, StoreError> {
    let store = HttpLeadStore::new(config)?;
    Ok(LeadSession::new(store).with_saved_display(config.saved_display()))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
