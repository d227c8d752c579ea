//! Adapter implementations for application ports.

mod fn_handler;
mod reporter;
mod service_handler;

pub use fn_handler::{FnHandler, handler_fn};
pub use reporter::{CollectingReporter, TracingReporter};
pub use service_handler::ServiceHandler;
