//! Iffy Domain - Core types
//!
//! This crate defines the domain model of the iffy call orchestrator:
//! request bodies, calls, captured responses, checkers and decode targets.
//! All types here are pure Rust with no I/O dependencies.

pub mod decode;
pub mod error;
pub mod render;
pub mod request;
pub mod response;
pub mod settings;
pub mod testing;

pub use decode::{Captured, DecodeTarget, Decoded};
pub use error::{DomainError, DomainResult};
pub use render::{NO_VALUE, Render, RenderError};
pub use request::{
    Body, BodyError, Call, FormBody, Headers, IntoBody, JsonBody, NoopBody, StringBody,
};
pub use response::CapturedResponse;
pub use settings::RunnerSettings;
pub use testing::{CheckError, Checker, DEFAULT_PREVIEW_LIMIT, preview};
