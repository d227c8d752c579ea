//! Iffy Application - Scenario execution
//!
//! This crate runs scenarios of HTTP calls against a handler:
//! - Template rendering against captured response values
//! - The sequential runner and its reports
//! - Ports for the handler under test, failure reporting and time

pub mod error;
pub mod ports;
pub mod report;
pub mod runner;
pub mod template;

pub use error::{Failure, RunError};
pub use ports::{Clock, Handler, HandlerError, Reporter, SystemClock};
pub use report::{CallOutcome, RunReport};
pub use runner::Tester;
pub use template::{ValueStore, parse_template};
