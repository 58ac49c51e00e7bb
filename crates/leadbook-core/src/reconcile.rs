//! Snapshot reconciliation
//!
//! The [`Reconciler`] holds two snapshots of the lead set:
//! - `persisted`: what the store last confirmed
//! - `working`: the local, possibly edited state
//!
//! A save sends the whole of [`prepare_save_payload`] to the store, which
//! replaces its rows by set. Leads missing from the payload are deleted there.

use crate::error::LeadError;
use crate::lead::{truncate_millis, Lead, LeadId, LeadPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

fn index_by_id(leads: &[Lead]) -> HashMap<&LeadId, &Lead> {
    leads.iter().map(|lead| (lead.id(), lead)).collect()
}

/// Whether the two sets differ, ignoring order.
///
/// Every field counts, timestamps included.
#[must_use]
pub fn has_unsaved_changes(persisted: &[Lead], working: &[Lead]) -> bool {
    if persisted.len() != working.len() {
        return true;
    }
    let index = index_by_id(persisted);
    if index.len() != persisted.len() {
        return true;
    }

    let mut seen = HashSet::with_capacity(working.len());
    working.iter().any(|lead| {
        !seen.insert(lead.id()) || index.get(lead.id()).map_or(true, |original| *original != lead)
    })
}

/// Build the save payload: `working` in order, with new and modified leads
/// stamped.
///
/// New leads get exactly `now`. Modified leads get `now`, or their persisted
/// timestamp if that is later, so a lead's timestamp never goes backwards.
/// Applying this to its own output with the same `now` changes nothing.
#[must_use]
pub fn prepare_save_payload(persisted: &[Lead], working: &[Lead], now: DateTime<Utc>) -> Vec<Lead> {
    let now = truncate_millis(now);
    let index = index_by_id(persisted);

    working
        .iter()
        .map(|lead| match index.get(lead.id()) {
            None => lead.clone().with_updated_at(now),
            Some(original) if *original != lead => {
                lead.clone().with_updated_at(now.max(original.updated_at))
            }
            Some(_) => lead.clone(),
        })
        .collect()
}

/// What a save will do to the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// In working, not persisted
    pub added: Vec<LeadId>,
    /// In both, different
    pub modified: Vec<LeadId>,
    /// Persisted, dropped from working
    pub removed: Vec<LeadId>,
}

impl ChangeSummary {
    /// Compare two snapshots
    #[must_use]
    pub fn between(persisted: &[Lead], working: &[Lead]) -> Self {
        let index = index_by_id(persisted);
        let working_ids: HashSet<&LeadId> = working.iter().map(Lead::id).collect();

        let mut summary = Self::default();
        for lead in working {
            match index.get(lead.id()) {
                None => summary.added.push(lead.id().clone()),
                Some(original) if *original != lead => summary.modified.push(lead.id().clone()),
                Some(_) => {}
            }
        }
        summary.removed = persisted
            .iter()
            .filter(|lead| !working_ids.contains(lead.id()))
            .map(|lead| lead.id().clone())
            .collect();
        summary
    }

    /// No difference
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} modified, {} removed",
            self.added.len(),
            self.modified.len(),
            self.removed.len()
        )
    }
}

/// The two lead snapshots and the edits between them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciler {
    persisted: Vec<Lead>,
    working: Vec<Lead>,
}

impl Reconciler {
    /// Start from a freshly loaded set
    #[must_use]
    pub fn new(loaded: Vec<Lead>) -> Self {
        Self {
            persisted: loaded.clone(),
            working: loaded,
        }
    }

    /// Replace both snapshots, discarding local edits
    pub fn reset(&mut self, loaded: Vec<Lead>) {
        self.persisted.clone_from(&loaded);
        self.working = loaded;
    }

    /// Last store-confirmed state
    #[inline]
    #[must_use]
    pub fn persisted(&self) -> &[Lead] {
        &self.persisted
    }

    /// Local state
    #[inline]
    #[must_use]
    pub fn working(&self) -> &[Lead] {
        &self.working
    }

    /// Look up a working lead
    #[must_use]
    pub fn get(&self, id: &LeadId) -> Option<&Lead> {
        self.working.iter().find(|lead| lead.id() == id)
    }

    /// See [`has_unsaved_changes`]
    #[inline]
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        has_unsaved_changes(&self.persisted, &self.working)
    }

    /// Working leads, most recently updated first
    #[must_use]
    pub fn by_recency(&self) -> Vec<Lead> {
        let mut leads = self.working.clone();
        leads.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id().cmp(b.id()))
        });
        leads
    }

    /// Add a lead to the working set
    pub fn insert(&mut self, lead: Lead) -> Result<(), LeadError> {
        if self.get(lead.id()).is_some() {
            return Err(LeadError::DuplicateId(lead.id().clone()));
        }
        self.working.push(lead);
        Ok(())
    }

    /// Edit a working lead; stamps it when a field actually changed
    pub fn apply_patch(
        &mut self,
        id: &LeadId,
        patch: &LeadPatch,
        now: DateTime<Utc>,
    ) -> Result<Lead, LeadError> {
        patch.validate()?;
        let lead = self
            .working
            .iter_mut()
            .find(|lead| lead.id() == id)
            .ok_or_else(|| LeadError::UnknownLead(id.clone()))?;

        if lead.apply(patch) {
            lead.updated_at = truncate_millis(now).max(lead.updated_at);
        }
        Ok(lead.clone())
    }

    /// Drop a lead from the working set; the next save deletes it
    pub fn remove(&mut self, id: &LeadId) -> Result<Lead, LeadError> {
        let position = self
            .working
            .iter()
            .position(|lead| lead.id() == id)
            .ok_or_else(|| LeadError::UnknownLead(id.clone()))?;
        Ok(self.working.remove(position))
    }

    /// See [`prepare_save_payload`]
    #[inline]
    #[must_use]
    pub fn prepare_save_payload(&self, now: DateTime<Utc>) -> Vec<Lead> {
        prepare_save_payload(&self.persisted, &self.working, now)
    }

    /// See [`ChangeSummary::between`]
    #[inline]
    #[must_use]
    pub fn summarize(&self) -> ChangeSummary {
        ChangeSummary::between(&self.persisted, &self.working)
    }

    /// Record a successful save.
    ///
    /// `sent` is the working snapshot the payload was built from. `persisted`
    /// becomes `payload`. Working leads still identical to their `sent` copy
    /// take the stamped payload copy; leads touched since keep local state.
    /// With no edits in between, `working` ends up equal to `payload`.
    pub fn rebase(&mut self, sent: &[Lead], payload: Vec<Lead>) {
        let working = {
            let before = index_by_id(sent);
            let stamped = index_by_id(&payload);
            self.working
                .iter()
                .map(|lead| match (before.get(lead.id()), stamped.get(lead.id())) {
                    (Some(sent_copy), Some(stamped_copy)) if *sent_copy == lead => (*stamped_copy).clone(),
                    _ => lead.clone(),
                })
                .collect()
        };
        self.working = working;
        self.persisted = payload;
    }
}
