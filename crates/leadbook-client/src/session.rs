//! Client session: local edits and the batch save protocol
//!
//! A [`LeadSession`] owns a [`Reconciler`] and a [`SaveTracker`] behind one
//! mutex. The lock is never held across an `.await`; the store write is the
//! only suspension point in [`LeadSession::save`].

use crate::error::SessionError;
use leadbook_compose::{
    compose_with_greeting, draft_or_fallback, whatsapp_link, MessageGenerator, MessageRequest,
};
use leadbook_core::{
    ChangeSummary, Clock, Lead, LeadDraft, LeadError, LeadId, LeadPatch, Reconciler, SaveStatus,
    SaveTracker, SystemClock,
};
use leadbook_store::{LeadStore, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of [`LeadSession::load_or_seed`]
#[derive(Debug)]
pub enum LoadOutcome {
    /// Store answered; both snapshots hold its rows
    Loaded {
        /// Number of leads loaded
        count: usize,
    },
    /// Store failed; both snapshots hold the seed leads
    Fallback {
        /// Why the store could not be read
        error: StoreError,
    },
}

/// Result of [`LeadSession::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Store accepted the payload
    Saved {
        /// Payload as sent, timestamps stamped
        leads: Vec<Lead>,
        /// What the payload changed
        summary: ChangeSummary,
    },
    /// Working set already matched the store
    NothingToSave,
    /// Another save was still running; this request was ignored
    InFlight,
}

/// A ready-to-send follow-up for one lead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Greeting plus body
    pub text: String,
    /// WhatsApp click-to-chat link carrying `text`
    pub whatsapp_url: String,
    /// `false` when the fallback template was used
    pub generated: bool,
}

#[derive(Debug)]
struct SessionState {
    reconciler: Reconciler,
    tracker: SaveTracker,
}

/// Local lead editing over a [`LeadStore`]
pub struct LeadSession<S> {
    store: S,
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
}

impl<S: LeadStore> LeadSession<S> {
    /// Empty session over `store` using the system clock
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            state: Mutex::new(SessionState {
                reconciler: Reconciler::default(),
                tracker: SaveTracker::new(),
            }),
        }
    }

    /// Use `clock` for lead timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// How long a successful save reads as `saved`
    #[must_use]
    pub fn with_saved_display(mut self, window: Duration) -> Self {
        self.state.get_mut().tracker = SaveTracker::with_display_window(window);
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace both snapshots with the store's rows
    pub async fn load(&self) -> Result<usize, SessionError> {
        let leads = self.store.fetch_all().await?;
        let count = leads.len();
        self.state.lock().reconciler.reset(leads);
        tracing::info!(count, "leads loaded");
        Ok(count)
    }

    /// As [`Self::load`], falling back to `seed` when the store is unreachable
    pub async fn load_or_seed(&self, seed: Vec<Lead>) -> LoadOutcome {
        match self.store.fetch_all().await {
            Ok(leads) => {
                let count = leads.len();
                self.state.lock().reconciler.reset(leads);
                tracing::info!(count, "leads loaded");
                LoadOutcome::Loaded { count }
            }
            Err(error) => {
                tracing::error!(error = %error, seeded = seed.len(), "failed to load leads, using seed data");
                self.state.lock().reconciler.reset(seed);
                LoadOutcome::Fallback { error }
            }
        }
    }

    /// Working leads, most recently updated first
    #[must_use]
    pub fn leads(&self) -> Vec<Lead> {
        self.state.lock().reconciler.by_recency()
    }

    /// One working lead
    #[must_use]
    pub fn lead(&self, id: &LeadId) -> Option<Lead> {
        self.state.lock().reconciler.get(id).cloned()
    }

    /// Whether the working set differs from the last saved state
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.lock().reconciler.has_unsaved_changes()
    }

    /// Changes a save would send
    #[must_use]
    pub fn pending_changes(&self) -> ChangeSummary {
        self.state.lock().reconciler.summarize()
    }

    /// Save button status right now
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.state.lock().tracker.status(Instant::now())
    }

    /// Add a lead under a fresh id, stamped now
    pub fn add_lead(&self, draft: LeadDraft) -> Result<Lead, SessionError> {
        draft.validate()?;
        let mut state = self.state.lock();
        let id = loop {
            let candidate = LeadId::generate();
            let taken = state.reconciler.get(&candidate).is_some()
                || state
                    .reconciler
                    .persisted()
                    .iter()
                    .any(|lead| lead.id() == &candidate);
            if !taken {
                break candidate;
            }
            tracing::debug!(id = %candidate, "generated lead id collided, retrying");
        };

        let lead = Lead::new(id, draft, self.clock.now());
        state.reconciler.insert(lead.clone())?;
        state.tracker.record_edit();
        tracing::debug!(id = %lead.id(), "lead added");
        Ok(lead)
    }

    /// Edit a lead in place
    pub fn update_lead(&self, id: &LeadId, patch: &LeadPatch) -> Result<Lead, SessionError> {
        let mut state = self.state.lock();
        let lead = state.reconciler.apply_patch(id, patch, self.clock.now())?;
        state.tracker.record_edit();
        Ok(lead)
    }

    /// Drop a lead locally; the next save deletes it from the store
    pub fn remove_lead(&self, id: &LeadId) -> Result<Lead, SessionError> {
        let mut state = self.state.lock();
        let lead = state.reconciler.remove(id)?;
        state.tracker.record_edit();
        tracing::debug!(id = %id, "lead removed");
        Ok(lead)
    }

    /// Send the working set to the store.
    ///
    /// A call made while another save is running returns
    /// [`SaveOutcome::InFlight`] without touching the store. On failure the
    /// persisted snapshot and every local edit are kept.
    pub async fn save(&self) -> Result<SaveOutcome, SessionError> {
        let (sent, payload, summary) = {
            let mut state = self.state.lock();
            state.tracker.settle(Instant::now());
            if state.tracker.is_saving() {
                tracing::debug!("save ignored, another save is in flight");
                return Ok(SaveOutcome::InFlight);
            }
            if !state.reconciler.has_unsaved_changes() {
                return Ok(SaveOutcome::NothingToSave);
            }

            let sent = state.reconciler.working().to_vec();
            let payload = state.reconciler.prepare_save_payload(self.clock.now());
            let summary = state.reconciler.summarize();
            state.tracker.begin()?;
            (sent, payload, summary)
        };

        tracing::info!(%summary, count = payload.len(), "saving leads");
        let guard = InFlight::new(&self.state);
        let result = self.store.replace_all(&payload).await;
        guard.disarm();

        let mut state = self.state.lock();
        match result {
            Ok(()) => {
                state.reconciler.rebase(&sent, payload.clone());
                state.tracker.succeed(Instant::now())?;
                tracing::info!(%summary, "leads saved");
                Ok(SaveOutcome::Saved {
                    leads: payload,
                    summary,
                })
            }
            Err(err) => {
                state.tracker.fail()?;
                tracing::error!(error = %err, "failed to save leads");
                Err(err.into())
            }
        }
    }

    /// Draft a greeting-prefixed follow-up for `id` and its WhatsApp link.
    ///
    /// Generation failures fall back to the template; only an unknown id
    /// is an error.
    pub async fn draft_message<G>(&self, generator: &G, id: &LeadId) -> Result<OutboundMessage, SessionError>
    where
        G: MessageGenerator + ?Sized,
    {
        let lead = self
            .lead(id)
            .ok_or_else(|| LeadError::UnknownLead(id.clone()))?;
        let draft = draft_or_fallback(generator, &MessageRequest::from(&lead)).await;
        let text = compose_with_greeting(&lead.name, &draft.text);
        Ok(OutboundMessage {
            whatsapp_url: whatsapp_link(&lead.phone, &text),
            text,
            generated: draft.generated,
        })
    }
}

/// Returns the tracker to idle if the save future is dropped mid-write
struct InFlight<'a> {
    state: Option<&'a Mutex<SessionState>>,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<SessionState>) -> Self {
        Self { state: Some(state) }
    }

    fn disarm(mut self) {
        self.state = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            let mut state = state.lock();
            if state.tracker.is_saving() {
                tracing::warn!("save abandoned before the store answered");
                let _ = state.tracker.fail();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbook_core::LeadStatus;
    use leadbook_store::MemoryLeadStore;

    fn session() -> LeadSession<MemoryLeadStore> {
        LeadSession::new(MemoryLeadStore::new())
    }

    #[test]
    fn add_requires_name_and_company() {
        let session = session();
        let err = session.add_lead(LeadDraft::new("Ada", " ")).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Lead(LeadError::EmptyField { field: "company" })
        ));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn edits_mark_unsaved() {
        let session = session();
        let lead = session.add_lead(LeadDraft::new("Ada", "Acme")).unwrap();
        assert!(session.has_unsaved_changes());

        let updated = session
            .update_lead(lead.id(), &LeadPatch::new().status(LeadStatus::Won))
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Won);
        assert_eq!(session.pending_changes().added, vec![lead.id().clone()]);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let session = session();
        let ghost = LeadId::new("ghost").unwrap();
        assert!(session.remove_lead(&ghost).is_err());
        assert!(session
            .update_lead(&ghost, &LeadPatch::new().notes("x"))
            .is_err());
    }

    #[tokio::test]
    async fn save_with_no_changes_does_nothing() {
        let session = session();
        assert_eq!(session.save().await.unwrap(), SaveOutcome::NothingToSave);
        assert_eq!(session.save_status(), SaveStatus::Idle);
    }

    #[tokio::test]
    async fn dropped_save_returns_to_idle() {
        let session = session();
        session.add_lead(LeadDraft::new("Ada", "Acme")).unwrap();
        {
            let state = &session.state;
            state.lock().tracker.begin().unwrap();
            let _guard = InFlight::new(state);
        }
        assert_eq!(session.save_status(), SaveStatus::Idle);
        assert!(session.has_unsaved_changes());
    }
}
