//! Wall-clock source for lead timestamps

use crate::lead::truncate_millis;
use chrono::{DateTime, Utc};

/// Source of "now" for stamping leads
pub trait Clock: Send + Sync {
    /// Current instant, millisecond precision
    fn now(&self) -> DateTime<Utc>;
}

/// System time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_millis(Utc::now())
    }
}
