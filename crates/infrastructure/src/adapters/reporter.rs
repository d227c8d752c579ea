//! Reporter adapters.

use std::sync::Arc;

use iffy_application::Failure;
use iffy_application::ports::Reporter;
use parking_lot::Mutex;
use tracing::warn;

/// Logs each failure at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn error(&mut self, failure: &Failure) {
        warn!(call = %failure.call, error = %failure.error, "check failed");
    }
}

/// Keeps failure messages in a shared list.
///
/// Clones share the same list, so a test can hand one clone to the tester and
/// read the messages from another.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the collected messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns the number of collected messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn error(&mut self, failure: &Failure) {
        self.messages.lock().push(failure.to_string());
    }
}
