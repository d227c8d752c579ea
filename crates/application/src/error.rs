//! Application error types

use std::fmt;

use iffy_domain::{BodyError, CheckError, RenderError};
use thiserror::Error;

use crate::ports::HandlerError;

/// Everything that can go wrong while running one call.
#[derive(Debug, Error)]
pub enum RunError {
    /// A query, header or body template failed to render.
    #[error("template error: {0}")]
    Render(#[from] RenderError),

    /// The request body could not be built.
    #[error("body error: {0}")]
    Body(#[from] BodyError),

    /// The rendered query is not a valid request target.
    #[error("invalid request uri '{uri}': {reason}")]
    InvalidUri {
        /// The rendered query.
        uri: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A rendered header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The rendered header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The handler returned no response.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The response body did not decode into the registered target.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A checker rejected the response.
    #[error(transparent)]
    Check(#[from] CheckError),
}

/// A failure attributed to the call that caused it.
#[derive(Debug)]
pub struct Failure {
    /// Name of the failing call.
    pub call: String,
    /// What went wrong.
    pub error: RunError,
}

impl Failure {
    /// Creates a failure for `call`.
    #[must_use]
    pub fn new(call: impl Into<String>, error: impl Into<RunError>) -> Self {
        Self {
            call: call.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.call, self.error)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
