//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while assembling request bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request body could not be built from the given input.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
