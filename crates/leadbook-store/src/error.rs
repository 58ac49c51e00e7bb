//! Store error types
//!
//! Every failure maps onto one of three kinds the caller can act on:
//! transport (could not reach the store), transaction (the store failed to
//! apply or read), malformed (the data itself was rejected).

/// Lead store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver error
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Could not reach the store
    #[error("transport error: {0}")]
    Transport(String),

    /// Store answered with an error status
    #[error("store rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Payload could not be decoded or violates the set invariants
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A stored row could not be turned back into a lead
    #[error("corrupt row {id:?}: {reason}")]
    CorruptRow {
        /// Row identifier as stored
        id: String,
        /// What was wrong
        reason: String,
    },
}

/// Coarse classification of [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Network or connection failure
    Transport,
    /// Store-side failure while reading or writing
    Transaction,
    /// Rejected data
    Malformed,
}

impl StoreError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            #[cfg(feature = "sqlite")]
            StoreError::Database(_) => StoreErrorKind::Transaction,
            StoreError::Transport(_) => StoreErrorKind::Transport,
            StoreError::Rejected { status, .. } if (400..500).contains(status) => {
                StoreErrorKind::Malformed
            }
            StoreError::Rejected { .. } => StoreErrorKind::Transaction,
            StoreError::Malformed(_) | StoreError::CorruptRow { .. } => StoreErrorKind::Malformed,
        }
    }

    /// Message suitable for showing to a user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            StoreErrorKind::Transport => {
                "Could not reach the lead store. Check your connection and try again.".to_string()
            }
            StoreErrorKind::Transaction => {
                "The lead store could not complete the request. Please try again.".to_string()
            }
            StoreErrorKind::Malformed => format!("The lead data was rejected: {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_status_classification() {
        let bad_request = StoreError::Rejected {
            status: 400,
            message: "Missing request body".into(),
        };
        let server = StoreError::Rejected {
            status: 500,
            message: "Server error: disk full".into(),
        };
        assert_eq!(bad_request.kind(), StoreErrorKind::Malformed);
        assert_eq!(server.kind(), StoreErrorKind::Transaction);
        assert!(bad_request.user_message().contains("Missing request body"));
    }

    #[test]
    fn transport_message_mentions_connection() {
        let err = StoreError::Transport("connection refused".into());
        assert!(err.user_message().contains("connection"));
    }
}
