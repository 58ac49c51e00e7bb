//! Lead records and their edits
//!
//! Defines:
//! - [`LeadId`]: opaque, immutable identifier
//! - [`LeadStatus`]: the sales pipeline stage
//! - [`Lead`]: the persisted record
//! - [`LeadDraft`] / [`LeadPatch`]: add-form payload and field-level edit
//!
//! Timestamps travel as ISO-8601 strings with millisecond precision
//! (`2024-05-01T10:00:00.000Z`) and are held at that precision in memory.

use crate::error::LeadError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque lead identifier
///
/// Any non-empty string is accepted; generated ids are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LeadId(String);

impl LeadId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Result<Self, LeadError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LeadError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LeadId {
    type Error = LeadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LeadId> for String {
    fn from(id: LeadId) -> Self {
        id.0
    }
}

impl FromStr for LeadId {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LeadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    /// Not yet contacted
    #[default]
    New,
    /// First contact made
    Contacted,
    /// Confirmed as a real opportunity
    Qualified,
    /// Went elsewhere
    Lost,
    /// Signed
    Won,
}

impl LeadStatus {
    /// Every status, in pipeline order
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
        LeadStatus::Won,
    ];

    /// Wire/database name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Lost => "Lost",
            LeadStatus::Won => "Won",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LeadError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sales prospect
///
/// # Invariants
/// - `id` never changes after construction (no setter, not part of [`LeadPatch`])
/// - `updated_at` only moves forward; see [`crate::Reconciler`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    id: LeadId,
    /// Contact name
    pub name: String,
    /// Phone number as entered
    pub phone: String,
    /// Company name
    pub company: String,
    /// Pipeline stage
    pub status: LeadStatus,
    /// Free-text notes from past interactions
    pub notes: String,
    /// Last update instant
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Build a lead from a draft
    #[must_use]
    pub fn new(id: LeadId, draft: LeadDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            company: draft.company,
            status: draft.status,
            notes: draft.notes,
            updated_at: truncate_millis(updated_at),
        }
    }

    /// Identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &LeadId {
        &self.id
    }

    /// Same lead with a different timestamp
    #[inline]
    #[must_use]
    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = truncate_millis(at);
        self
    }

    /// Apply a patch in place, returning whether any field changed.
    ///
    /// Does not touch `updated_at`; stamping is the caller's decision.
    pub fn apply(&mut self, patch: &LeadPatch) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.name, patch.name.as_ref());
        changed |= assign(&mut self.phone, patch.phone.as_ref());
        changed |= assign(&mut self.company, patch.company.as_ref());
        changed |= assign(&mut self.status, patch.status.as_ref());
        changed |= assign(&mut self.notes, patch.notes.as_ref());
        changed
    }
}

fn assign<T: PartialEq + Clone>(slot: &mut T, value: Option<&T>) -> bool {
    match value {
        Some(value) if *slot != *value => {
            slot.clone_from(value);
            true
        }
        _ => false,
    }
}

/// Payload of the add-lead form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    /// Contact name (required)
    pub name: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// Company name (required)
    pub company: String,
    /// Initial stage
    #[serde(default)]
    pub status: LeadStatus,
    /// Notes
    #[serde(default)]
    pub notes: String,
}

impl LeadDraft {
    /// Create a draft with the required fields
    #[must_use]
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            ..Self::default()
        }
    }

    /// With phone number
    #[inline]
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// With notes
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// With initial status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = status;
        self
    }

    /// Name and company must be non-blank
    pub fn validate(&self) -> Result<(), LeadError> {
        require("name", &self.name)?;
        require("company", &self.company)
    }
}

/// Field-level edit of an existing lead
///
/// `None` leaves a field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// New stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    /// Replacement notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the phone number
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the company
    #[must_use]
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the stage
    #[must_use]
    pub fn status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the notes
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Required fields may be changed but not blanked
    pub fn validate(&self) -> Result<(), LeadError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(company) = &self.company {
            require("company", company)?;
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), LeadError> {
    if value.trim().is_empty() {
        Err(LeadError::EmptyField { field })
    } else {
        Ok(())
    }
}

/// Drop sub-millisecond precision
#[inline]
#[must_use]
pub fn truncate_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Render as ISO-8601 UTC with milliseconds
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp, normalized to UTC milliseconds
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LeadError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| truncate_millis(at.with_timezone(&Utc)))
        .map_err(|e| LeadError::InvalidTimestamp {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Serde adapter for millisecond ISO-8601 timestamps
pub mod iso_millis {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample() -> Lead {
        Lead::new(
            LeadId::new("lead-1").unwrap(),
            LeadDraft::new("Jane Smith", "Solutions Inc.")
                .with_phone("+1-555-987-6543")
                .with_status(LeadStatus::Contacted)
                .with_notes("Sent brochure."),
            at(1_714_557_600_123),
        )
    }

    #[test]
    fn lead_serializes_camel_case_with_millis() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "lead-1");
        assert_eq!(json["status"], "Contacted");
        assert_eq!(json["updatedAt"], "2024-05-01T10:00:00.123Z");
    }

    #[test]
    fn lead_deserializes_offset_timestamps_to_utc() {
        let raw = r#"{"id":"x","name":"A","phone":"","company":"B","status":"Won",
            "notes":"","updatedAt":"2024-05-01T12:00:00.123456+02:00"}"#;
        let lead: Lead = serde_json::from_str(raw).unwrap();
        assert_eq!(lead.updated_at, at(1_714_557_600_123));
        assert_eq!(lead.status, LeadStatus::Won);
    }

    #[test]
    fn empty_id_is_rejected_on_the_wire() {
        let raw = r#"{"id":" ","name":"A","phone":"","company":"B","status":"New",
            "notes":"","updatedAt":"2024-05-01T10:00:00.000Z"}"#;
        assert!(serde_json::from_str::<Lead>(raw).is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            "Pending".parse::<LeadStatus>(),
            Err(LeadError::InvalidStatus(s)) if s == "Pending"
        ));
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn apply_reports_only_real_changes() {
        let mut lead = sample();
        assert!(!lead.apply(&LeadPatch::new().name("Jane Smith")));
        assert!(lead.apply(&LeadPatch::new().status(LeadStatus::Won).notes("Signed")));
        assert_eq!(lead.status, LeadStatus::Won);
        assert_eq!(lead.notes, "Signed");
        assert_eq!(lead.id().as_str(), "lead-1");
    }

    #[test]
    fn draft_requires_name_and_company() {
        assert_eq!(
            LeadDraft::new("", "Acme").validate(),
            Err(LeadError::EmptyField { field: "name" })
        );
        assert_eq!(
            LeadDraft::new("Ann", "  ").validate(),
            Err(LeadError::EmptyField { field: "company" })
        );
        assert!(LeadDraft::new("Ann", "Acme").validate().is_ok());
    }

    #[test]
    fn generated_ids_are_uuids() {
        let id = LeadId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
