//! Message generation errors

/// Message generation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// No API key configured
    #[error("missing API key for the message provider")]
    MissingCredentials,

    /// Request lacks the lead fields the prompt needs
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Could not reach the provider
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with an error status
    #[error("provider returned {status}: {body}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Provider answered without any text
    #[error("provider returned an empty message")]
    EmptyResponse,

    /// Provider response could not be decoded
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl GenerateError {
    /// Message suitable for showing to a user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::MissingCredentials => {
                "Message generation is not configured. Ask an administrator to set an API key."
                    .to_string()
            }
            GenerateError::InvalidRequest(reason) => {
                format!("Cannot generate a message for this lead: {reason}.")
            }
            _ => "Failed to generate AI-powered message. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerateError::Malformed(err.to_string())
        } else {
            GenerateError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_share_retry_message() {
        let err = GenerateError::Provider {
            status: 503,
            body: "overloaded".into(),
        };
        assert!(err.user_message().contains("try again"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn missing_key_is_explained() {
        assert!(GenerateError::MissingCredentials
            .user_message()
            .contains("API key"));
    }
}
