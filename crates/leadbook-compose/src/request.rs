//! The generator seam

use crate::error::GenerateError;
use async_trait::async_trait;
use leadbook_core::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};

/// Lead fields sent to a message generator
///
/// Every field defaults when absent so an incomplete body can be rejected
/// with a validation error rather than a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    /// Contact name
    #[serde(default)]
    pub name: String,
    /// Company name
    #[serde(default)]
    pub company: String,
    /// Notes from the last interaction
    #[serde(default)]
    pub notes: String,
    /// Pipeline stage, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
}

impl MessageRequest {
    /// Request for `name` at `company` with no notes
    #[must_use]
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            ..Self::default()
        }
    }

    /// Set the interaction notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the pipeline stage
    #[must_use]
    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Name and company must both be present
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.name.trim().is_empty() || self.company.trim().is_empty() {
            return Err(GenerateError::InvalidRequest(
                "name and company are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&Lead> for MessageRequest {
    fn from(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            company: lead.company.clone(),
            notes: lead.notes.clone(),
            status: Some(lead.status),
        }
    }
}

/// Turns lead details into a message body
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Draft a message body (no greeting) for the lead
    async fn generate(&self, request: &MessageRequest) -> Result<String, GenerateError>;
}

#[async_trait]
impl<T: MessageGenerator + ?Sized> MessageGenerator for std::sync::Arc<T> {
    async fn generate(&self, request: &MessageRequest) -> Result<String, GenerateError> {
        (**self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_decode_as_blank() {
        let request: MessageRequest = serde_json::from_str(r#"{"company":"Acme"}"#).unwrap();
        assert_eq!(request.name, "");
        assert!(matches!(
            request.validate(),
            Err(GenerateError::InvalidRequest(_))
        ));
    }

    #[test]
    fn full_lead_body_is_accepted() {
        let body = r#"{"id":"1","name":"Ada","phone":"","company":"Acme","status":"Won","notes":"n","updatedAt":"2024-01-01T00:00:00.000Z"}"#;
        let request: MessageRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.status, Some(LeadStatus::Won));
        assert!(request.validate().is_ok());
    }
}
