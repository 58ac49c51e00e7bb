//! Error types for the lead model and save-status machine

use crate::lead::LeadId;
use crate::save_state::SaveStatus;

/// Lead validation and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadError {
    /// Required field left blank
    #[error("{field} is required")]
    EmptyField {
        /// Field name as shown in the form
        field: &'static str,
    },

    /// Identifier was blank
    #[error("lead id must not be empty")]
    EmptyId,

    /// No lead with this id in the working set
    #[error("lead not found: {0}")]
    UnknownLead(LeadId),

    /// Identifier already present in the working set
    #[error("duplicate lead id: {0}")]
    DuplicateId(LeadId),

    /// Status string outside the pipeline
    #[error("invalid lead status: {0:?}")]
    InvalidStatus(String),

    /// Timestamp not in RFC 3339 form
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// Raw input
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Save-status machine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition not in [`crate::save_state::allowed_transitions`]
    #[error("illegal save status transition: {from} -> {to}")]
    Illegal {
        /// Current status
        from: SaveStatus,
        /// Requested status
        to: SaveStatus,
    },
}
