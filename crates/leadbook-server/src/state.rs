//! Shared handler state

use crate::config::DEFAULT_BODY_LIMIT;
use leadbook_compose::MessageGenerator;
use leadbook_store::LeadStore;
use std::fmt;
use std::sync::Arc;

/// Collaborators every request handler needs
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn LeadStore>,
    generator: Arc<dyn MessageGenerator>,
    body_limit: u64,
}

impl AppState {
    /// State over a store and a generator, with the default body limit
    pub fn new(store: Arc<dyn LeadStore>, generator: Arc<dyn MessageGenerator>) -> Self {
        Self {
            store,
            generator,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Set the largest accepted body
    #[must_use]
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Lead store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn LeadStore {
        self.store.as_ref()
    }

    /// Message generator
    #[inline]
    #[must_use]
    pub fn generator(&self) -> &dyn MessageGenerator {
        self.generator.as_ref()
    }

    /// Body limit in bytes
    #[inline]
    #[must_use]
    pub fn body_limit(&self) -> u64 {
        self.body_limit
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}
