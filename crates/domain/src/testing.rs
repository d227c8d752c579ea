//! Response checking.
//!
//! A [`Checker`] validates one captured response. Checkers are pure: they
//! never touch the value store, and any expected value is captured when the
//! checker is built.

use thiserror::Error;

use crate::response::CapturedResponse;

/// Reasons a checker rejects a response.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The status code differs from the expected one.
    #[error("bad status code: expected {expected}, got {actual}")]
    Status {
        /// Expected status code.
        expected: u16,
        /// Status code the handler returned.
        actual: u16,
    },

    /// A top-level JSON field is absent.
    #[error("missing expected field '{0}'")]
    MissingField(String),

    /// A JSON list has the wrong number of elements.
    #[error("expected a list of length {expected}, got {actual}")]
    ListLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A JSON list is empty.
    #[error("expected a non empty list")]
    EmptyList,

    /// A node along a JSON branch is absent.
    #[error("missing node '{0}'")]
    MissingNode(String),

    /// A leaf value differs from the expected literal.
    #[error("wrong value: expected '{expected}', got '{actual}'")]
    WrongValue {
        /// Expected literal.
        expected: String,
        /// Value found in the response.
        actual: String,
    },

    /// The body does not decode into the expected JSON shape.
    #[error("cannot decode body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A header is absent.
    #[error("header '{0}' not found")]
    MissingHeader(String),

    /// A header value differs from the expected one.
    #[error("header '{name}' value mismatch: expected '{expected}', got '{actual}'")]
    HeaderMismatch {
        /// Header name.
        name: String,
        /// Expected value or fragment.
        expected: String,
        /// Value found in the response.
        actual: String,
    },

    /// The body text does not satisfy an expectation.
    #[error("{expectation}, got '{preview}'")]
    BodyMismatch {
        /// Human readable expectation.
        expectation: String,
        /// Truncated body.
        preview: String,
    },

    /// The call registered no decode target of the expected type.
    #[error("no decoded response of type {0}")]
    NotDecoded(&'static str),

    /// Failure raised by a custom checker.
    #[error("{0}")]
    Custom(String),
}

impl CheckError {
    /// Creates a failure with a free-form message.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Validates a captured response.
pub trait Checker: Send + Sync {
    /// Checks the response.
    ///
    /// # Errors
    ///
    /// Returns the reason the response is rejected.
    fn check(&self, response: &CapturedResponse) -> Result<(), CheckError>;
}

impl<F> Checker for F
where
    F: Fn(&CapturedResponse) -> Result<(), CheckError> + Send + Sync,
{
    fn check(&self, response: &CapturedResponse) -> Result<(), CheckError> {
        self(response)
    }
}

/// Characters of a body shown in failure messages unless configured otherwise.
pub const DEFAULT_PREVIEW_LIMIT: usize = 100;

/// Truncates `text` to at most `limit` characters, appending `...` when cut.
#[must_use]
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
