//! Clock port for run timestamps

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Runs stamp their report with this clock, so tests can pin the start time.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
