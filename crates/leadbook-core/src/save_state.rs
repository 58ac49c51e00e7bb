//! Save-status machine
//!
//! `Idle -> Saving -> Saved -> Idle` on success (the last step happens on its
//! own once the display window passes), `Saving -> Idle` on failure.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// How long `Saved` is shown before reading as `Idle`
pub const DEFAULT_SAVED_DISPLAY: Duration = Duration::from_secs(2);

/// Status of the save button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Nothing in flight
    Idle,
    /// Store write in flight
    Saving,
    /// Last write succeeded recently
    Saved,
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
        })
    }
}

/// Validates a status transition.
pub fn validate_transition(from: SaveStatus, to: SaveStatus) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}

/// Statuses reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: SaveStatus) -> Vec<SaveStatus> {
    use SaveStatus::*;
    match from {
        Idle => vec![Saving],
        Saving => vec![Saved, Idle],
        Saved => vec![Idle, Saving],
    }
}

/// Tracks save status for one session
#[derive(Debug, Clone)]
pub struct SaveTracker {
    status: SaveStatus,
    saved_at: Option<Instant>,
    display_window: Duration,
}

impl SaveTracker {
    /// Idle tracker with the default display window
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_display_window(DEFAULT_SAVED_DISPLAY)
    }

    /// Idle tracker with a custom display window
    #[inline]
    #[must_use]
    pub fn with_display_window(display_window: Duration) -> Self {
        Self {
            status: SaveStatus::Idle,
            saved_at: None,
            display_window,
        }
    }

    /// Raw status, ignoring the display window
    #[inline]
    #[must_use]
    pub fn raw_status(&self) -> SaveStatus {
        self.status
    }

    /// Whether a write is in flight
    #[inline]
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    /// Status as observed at `now`: `Saved` reads as `Idle` once the window passed
    #[must_use]
    pub fn status(&self, now: Instant) -> SaveStatus {
        match (self.status, self.saved_at) {
            (SaveStatus::Saved, Some(at)) if now.saturating_duration_since(at) >= self.display_window => {
                SaveStatus::Idle
            }
            (status, _) => status,
        }
    }

    /// Fold an elapsed `Saved` back into `Idle`
    pub fn settle(&mut self, now: Instant) {
        if self.status(now) != self.status {
            self.status = SaveStatus::Idle;
            self.saved_at = None;
        }
    }

    /// Start a write
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.transition(SaveStatus::Saving)
    }

    /// Write completed
    pub fn succeed(&mut self, at: Instant) -> Result<(), TransitionError> {
        self.transition(SaveStatus::Saved)?;
        self.saved_at = Some(at);
        Ok(())
    }

    /// Write failed or was abandoned
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.transition(SaveStatus::Idle)
    }

    /// A local edit happened. Clears `Saved`; an in-flight write keeps `Saving`.
    pub fn record_edit(&mut self) {
        if self.status == SaveStatus::Saved {
            self.status = SaveStatus::Idle;
            self.saved_at = None;
        }
    }

    fn transition(&mut self, to: SaveStatus) -> Result<(), TransitionError> {
        validate_transition(self.status, to)?;
        tracing::trace!(from = %self.status, %to, "save status transition");
        self.status = to;
        if to != SaveStatus::Saved {
            self.saved_at = None;
        }
        Ok(())
    }
}

impl Default for SaveTracker {
    fn default() -> Self {
        Self::new()
    }
}
