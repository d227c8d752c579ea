//! Iffy Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the built-in checkers,
//! settings loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod testing;

pub use adapters::{CollectingReporter, FnHandler, ServiceHandler, TracingReporter, handler_fn};
pub use config::{ConfigError, apply_env_overrides, load_settings, settings_from_env};
pub use telemetry::init_tracing;
