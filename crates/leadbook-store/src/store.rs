//! The store seam

use crate::error::StoreError;
use async_trait::async_trait;
use leadbook_core::{Lead, LeadId};
use std::collections::HashSet;
use std::sync::Arc;

/// Relational table of leads keyed by id
///
/// Writes are replace-by-set: the caller always sends the complete desired
/// state and the store deletes whatever is missing from it.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// All leads, most recently updated first (ties by id)
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError>;

    /// Make the stored set equal to `leads`, all or nothing.
    ///
    /// Rows whose id is absent from `leads` are deleted; every given lead is
    /// inserted or has all its fields overwritten. An empty slice clears the
    /// table.
    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: LeadStore + ?Sized> LeadStore for Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError> {
        (**self).fetch_all().await
    }

    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        (**self).replace_all(leads).await
    }
}

/// Reject a payload that names the same lead twice
pub fn ensure_unique_ids(leads: &[Lead]) -> Result<(), StoreError> {
    let mut seen: HashSet<&LeadId> = HashSet::with_capacity(leads.len());
    match leads.iter().find(|lead| !seen.insert(lead.id())) {
        Some(duplicate) => Err(StoreError::Malformed(format!(
            "duplicate lead id {}",
            duplicate.id()
        ))),
        None => Ok(()),
    }
}

/// Order used by [`LeadStore::fetch_all`]
pub fn sort_by_recency(leads: &mut [Lead]) {
    leads.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id().cmp(b.id()))
    });
}
