//! HTTP response domain types

mod captured;

pub use captured::CapturedResponse;
