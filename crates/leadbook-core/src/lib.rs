//! Leadbook Core - lead model and save reconciliation
//!
//! Provides:
//! - The [`Lead`] record and its edits ([`LeadDraft`], [`LeadPatch`])
//! - [`Reconciler`]: persisted vs. working snapshots and the save payload
//! - [`SaveTracker`]: the `idle -> saving -> saved` status machine
//! - [`Clock`] for deterministic timestamps
//!
//! # Example
//!
//! ```rust
//! use leadbook_core::{Lead, LeadDraft, LeadId, LeadPatch, LeadStatus, Reconciler};
//! use chrono::Utc;
//!
//! let id = LeadId::generate();
//! let lead = Lead::new(id.clone(), LeadDraft::new("Ada", "Analytical Engines"), Utc::now());
//! let mut reconciler = Reconciler::new(vec![lead]);
//!
//! reconciler
//!     .apply_patch(&id, &LeadPatch::new().status(LeadStatus::Won), Utc::now())
//!     .unwrap();
//! assert!(reconciler.has_unsaved_changes());
//!
//! let payload = reconciler.prepare_save_payload(Utc::now());
//! assert_eq!(payload.len(), 1);
//! ```

#![warn(unreachable_pub)]

pub mod clock;
pub mod demo;
pub mod error;
pub mod lead;
pub mod reconcile;
pub mod save_state;

pub use clock::{Clock, SystemClock};
pub use demo::demo_leads;
pub use error::{LeadError, TransitionError};
pub use lead::{
    format_timestamp, parse_timestamp, truncate_millis, Lead, LeadDraft, LeadId, LeadPatch,
    LeadStatus,
};
pub use reconcile::{has_unsaved_changes, prepare_save_payload, ChangeSummary, Reconciler};
pub use save_state::{
    allowed_transitions, validate_transition, SaveStatus, SaveTracker, DEFAULT_SAVED_DISPLAY,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with leads
    pub use crate::{
        Clock, Lead, LeadDraft, LeadError, LeadId, LeadPatch, LeadStatus, Reconciler, SaveStatus,
        SaveTracker, SystemClock,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
