//! In-memory store

use crate::error::StoreError;
use crate::store::{ensure_unique_ids, sort_by_recency, LeadStore};
use async_trait::async_trait;
use leadbook_core::Lead;
use parking_lot::RwLock;

/// Process-local store with the same semantics as the SQL backend
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    rows: RwLock<Vec<Lead>>,
}

impl MemoryLeadStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `leads`
    #[must_use]
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            rows: RwLock::new(leads),
        }
    }

    /// Number of stored leads
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError> {
        let mut leads = self.rows.read().clone();
        sort_by_recency(&mut leads);
        Ok(leads)
    }

    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        ensure_unique_ids(leads)?;
        let mut rows = self.rows.write();
        let removed = rows
            .iter()
            .filter(|row| !leads.iter().any(|lead| lead.id() == row.id()))
            .count();
        *rows = leads.to_vec();
        tracing::debug!(upserted = leads.len(), removed, "memory store replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leadbook_core::{LeadDraft, LeadId};

    fn lead(id: &str, secs: i64) -> Lead {
        Lead::new(
            LeadId::new(id).unwrap(),
            LeadDraft::new("Ann", "Acme"),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn replace_drops_missing_rows() {
        let store = MemoryLeadStore::with_leads(vec![lead("1", 1), lead("2", 2)]);
        store.replace_all(&[lead("1", 5)]).await.unwrap();

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows, vec![lead("1", 5)]);
    }

    #[tokio::test]
    async fn duplicate_ids_leave_rows_intact() {
        let store = MemoryLeadStore::with_leads(vec![lead("1", 1)]);
        let err = store
            .replace_all(&[lead("2", 1), lead("2", 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert_eq!(store.len(), 1);
    }
}
