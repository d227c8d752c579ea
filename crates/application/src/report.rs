//! Run reports

use std::time::Duration;

use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use uuid::Uuid;

use crate::error::Failure;

/// What happened to one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Call name.
    pub name: String,
    /// Request method.
    pub method: Method,
    /// Rendered request target, if rendering succeeded.
    pub uri: Option<String>,
    /// Response status, if the handler answered.
    pub status: Option<StatusCode>,
    /// Time spent on the call, checkers included.
    pub elapsed: Duration,
}

/// Summary of one run.
///
/// A run never panics on failure, so dropping the report unread hides every
/// failure unless a reporter was set. Ignoring it is a compile error under
/// `deny(unused_must_use)`:
///
/// ```compile_fail
/// #![deny(unused_must_use)]
/// fn finished() -> iffy_application::RunReport {
///     unimplemented!()
/// }
///
/// fn main() {
///     finished();
/// }
/// ```
#[derive(Debug)]
#[must_use = "a run report holds the failures of the run; check it with `assert_passed`"]
pub struct RunReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total run time.
    pub elapsed: Duration,
    /// Outcome of every call, in run order.
    pub outcomes: Vec<CallOutcome>,
    /// Every failure, in the order it was reported.
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at,
            elapsed: Duration::ZERO,
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns true if no failure was reported.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failures reported for the named call.
    pub fn failures_for<'a>(&'a self, call: &'a str) -> impl Iterator<Item = &'a Failure> + 'a {
        self.failures.iter().filter(move |f| f.call == call)
    }

    /// Returns the outcome of the named call.
    #[must_use]
    pub fn outcome(&self, call: &str) -> Option<&CallOutcome> {
        self.outcomes.iter().find(|o| o.name == call)
    }

    /// Panics with every failure of the run unless it passed.
    ///
    /// # Panics
    ///
    /// Panics if any failure was reported.
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn assert_passed(&self) {
        if self.passed() {
            return;
        }
        let lines: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
        panic!(
            "run {} failed with {} error(s):\n  {}",
            self.run_id,
            lines.len(),
            lines.join("\n  ")
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use iffy_domain::CheckError;
    use pretty_assertions::assert_eq;

    fn report_with_failures() -> RunReport {
        let mut report = RunReport::new(Utc::now());
        report.outcomes.push(CallOutcome {
            name: "create".to_string(),
            method: Method::POST,
            uri: Some("/items".to_string()),
            status: Some(StatusCode::CREATED),
            elapsed: Duration::from_millis(3),
        });
        report
            .failures
            .push(Failure::new("create", CheckError::custom("first")));
        report
            .failures
            .push(Failure::new("fetch", CheckError::custom("second")));
        report
    }

    #[test]
    fn test_empty_report_passes() {
        let report = RunReport::new(Utc::now());
        assert!(report.passed());
        report.assert_passed();
    }

    #[test]
    fn test_failures_for_filters_by_call() {
        let report = report_with_failures();
        assert!(!report.passed());
        let messages: Vec<_> = report
            .failures_for("fetch")
            .map(ToString::to_string)
            .collect();
        assert_eq!(messages, vec!["fetch: second"]);
    }

    #[test]
    fn test_outcome_lookup() {
        let report = report_with_failures();
        let outcome = report.outcome("create").unwrap();
        assert_eq!(outcome.status, Some(StatusCode::CREATED));
        assert!(report.outcome("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "failed with 2 error(s)")]
    fn test_assert_passed_lists_failures() {
        report_with_failures().assert_passed();
    }
}
