//! Leadbook Store - replace-by-set lead persistence
//!
//! Provides:
//! - [`LeadStore`]: the async store seam (`fetch_all`, `replace_all`)
//! - [`SqliteLeadStore`]: sqlx-backed table with transactional replace
//! - [`MemoryLeadStore`]: process-local backend with the same semantics
//! - [`StoreError`] and its [`StoreErrorKind`] classification

#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryLeadStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteLeadStore, DEFAULT_MAX_CONNECTIONS};
pub use store::{ensure_unique_ids, sort_by_recency, LeadStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
