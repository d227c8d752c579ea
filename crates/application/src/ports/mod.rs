//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the runner and the outside world.
//! Each port is a trait implemented by adapters in the infrastructure layer
//! or directly by test code.

mod clock;
mod handler;
mod reporter;

pub use clock::{Clock, SystemClock};
pub use handler::{Handler, HandlerError};
pub use reporter::Reporter;
