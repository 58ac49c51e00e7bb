//! Session errors

use leadbook_core::{LeadError, TransitionError};
use leadbook_store::StoreError;

/// Errors surfaced by [`crate::LeadSession`]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Edit rejected by the lead model
    #[error(transparent)]
    Lead(#[from] LeadError),

    /// Store call failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Save status machine refused a step
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl SessionError {
    /// Message suitable for showing to a user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Lead(err) => format!("{err}."),
            SessionError::Store(err) => err.user_message(),
            SessionError::Transition(_) => "A save is already in progress.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_use_store_wording() {
        let err = SessionError::from(StoreError::Transport("timed out".into()));
        assert!(err.user_message().contains("Could not reach"));
    }

    #[test]
    fn lead_errors_name_the_field() {
        let err = SessionError::from(LeadError::EmptyField { field: "company" });
        assert_eq!(err.user_message(), "company is required.");
    }
}
