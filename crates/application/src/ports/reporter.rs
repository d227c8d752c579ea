//! Reporter port

use crate::error::Failure;

/// Receives every failure of a run as soon as it happens.
///
/// Reporting never stops the run. Closures taking a [`Failure`] are
/// reporters, and `()` discards everything.
pub trait Reporter: Send {
    /// Records one failure.
    fn error(&mut self, failure: &Failure);
}

impl Reporter for () {
    fn error(&mut self, _failure: &Failure) {}
}

impl<F> Reporter for F
where
    F: FnMut(&Failure) + Send,
{
    fn error(&mut self, failure: &Failure) {
        self(failure);
    }
}
