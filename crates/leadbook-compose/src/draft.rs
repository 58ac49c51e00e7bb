//! Generated drafts with a template fallback

use crate::request::{MessageGenerator, MessageRequest};

/// Body used when generation fails
pub const FALLBACK_MESSAGE: &str = "I hope you're having a great week. I wanted to quickly \
    follow up on our last conversation. Would you be available for a brief chat sometime next week?";

/// A message body and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Message body, without greeting
    pub text: String,
    /// `false` when [`FALLBACK_MESSAGE`] was used
    pub generated: bool,
}

impl Draft {
    /// The fallback template
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_MESSAGE.to_string(),
            generated: false,
        }
    }
}

/// Ask `generator` for a body, falling back to [`FALLBACK_MESSAGE`] on any error.
///
/// Never fails and never retries.
pub async fn draft_or_fallback<G>(generator: &G, request: &MessageRequest) -> Draft
where
    G: MessageGenerator + ?Sized,
{
    match generator.generate(request).await {
        Ok(text) => Draft {
            text,
            generated: true,
        },
        Err(err) => {
            tracing::warn!(error = %err, company = %request.company, "message generation failed, using fallback");
            Draft::fallback()
        }
    }
}
