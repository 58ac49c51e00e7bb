//! Testing utilities for the Leadbook workspace
//!
//! Shared fixtures, a hand-driven clock, a store with failure injection and
//! write gating, and a canned message generator.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use leadbook_compose::{GenerateError, MessageGenerator, MessageRequest};
use leadbook_core::{Clock, Lead, LeadDraft, LeadId, LeadStatus};
use leadbook_store::{LeadStore, MemoryLeadStore, StoreError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

pub fn at_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

pub fn lead_id(id: &str) -> LeadId {
    LeadId::new(id).unwrap()
}

pub fn lead(id: &str, status: LeadStatus, millis: i64) -> Lead {
    Lead::new(
        lead_id(id),
        LeadDraft::new(format!("Lead {id}"), "Acme Corp").with_status(status),
        at_millis(millis),
    )
}

/// Three leads at 1s, 2s and 3s past the epoch
pub fn sample_leads() -> Vec<Lead> {
    vec![
        Lead::new(
            lead_id("1"),
            LeadDraft::new("Ada Lovelace", "Analytical Engines")
                .with_phone("+44 20 7946 0001")
                .with_notes("Asked for pricing"),
            at_millis(1_000),
        ),
        Lead::new(
            lead_id("2"),
            LeadDraft::new("Grace Hopper", "Navy Labs")
                .with_status(LeadStatus::Contacted)
                .with_notes("Demo booked"),
            at_millis(2_000),
        ),
        Lead::new(
            lead_id("3"),
            LeadDraft::new("Alan Turing", "Bletchley Ltd").with_status(LeadStatus::Qualified),
            at_millis(3_000),
        ),
    ]
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn at_millis(millis: i64) -> Self {
        Self::new(at_millis(millis))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Releases writes held by [`ScriptedStore::hold_writes`]
#[derive(Debug, Clone)]
pub struct WriteGate {
    permits: Arc<Semaphore>,
}

impl WriteGate {
    /// Let one held write proceed
    pub fn release(&self) {
        self.permits.add_permits(1);
    }
}

/// In-memory store that can fail on demand and hold writes mid-flight
#[derive(Debug, Default)]
pub struct ScriptedStore {
    inner: MemoryLeadStore,
    write_failures: Mutex<VecDeque<StoreError>>,
    fetch_failures: Mutex<VecDeque<StoreError>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    entered: Arc<Notify>,
    writes: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            inner: MemoryLeadStore::with_leads(leads),
            ..Self::default()
        }
    }

    /// Next `replace_all` fails with `err` and leaves the rows alone
    pub fn fail_next_write(&self, err: StoreError) {
        self.write_failures.lock().push_back(err);
    }

    /// Next `fetch_all` fails with `err`
    pub fn fail_next_fetch(&self, err: StoreError) {
        self.fetch_failures.lock().push_back(err);
    }

    /// Park every subsequent write until the returned gate releases it
    pub fn hold_writes(&self) -> WriteGate {
        let permits = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(Arc::clone(&permits));
        WriteGate { permits }
    }

    /// Resolves once a write has entered the store
    pub async fn write_started(&self) {
        self.entered.notified().await;
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Stored rows, most recent first
    pub async fn rows(&self) -> Vec<Lead> {
        self.inner.fetch_all().await.unwrap()
    }
}

#[async_trait]
impl LeadStore for ScriptedStore {
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let failure = self.fetch_failures.lock().pop_front();
        match failure {
            Some(err) => Err(err),
            None => self.inner.fetch_all().await,
        }
    }

    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?
                .forget();
        }

        let failure = self.write_failures.lock().pop_front();
        match failure {
            Some(err) => Err(err),
            None => self.inner.replace_all(leads).await,
        }
    }
}

/// Generator returning a fixed reply or a fixed error
#[derive(Debug, Clone)]
pub struct StubGenerator {
    reply: Result<String, GenerateError>,
    calls: Arc<AtomicUsize>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing(err: GenerateError) -> Self {
        Self {
            reply: Err(err),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageGenerator for StubGenerator {
    async fn generate(&self, request: &MessageRequest) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        request.validate()?;
        self.reply.clone()
    }
}
