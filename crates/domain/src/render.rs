//! Template rendering contract.
//!
//! Bodies, query strings and headers are all rendered through the same
//! [`Render`] implementation, so a value captured from an earlier call can be
//! spliced into any part of a later request.

use thiserror::Error;

/// Text produced by a lookup that found nothing.
pub const NO_VALUE: &str = "<no value>";

/// Errors raised while rendering a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The template text is malformed.
    #[error("template syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset in the template where the problem was found.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// An action names a function other than `field` or `json`.
    #[error("unknown template function '{0}'")]
    UnknownFunction(String),

    /// A path segment addressed a value that is not a map.
    #[error("cannot dereference {found} with key '{key}'")]
    Dereference {
        /// The key that could not be applied.
        key: String,
        /// Kind of the value the key was applied to.
        found: &'static str,
    },

    /// A resolved value could not be serialized to JSON.
    #[error("cannot serialize value: {0}")]
    Serialize(String),
}

/// Renders template strings against the captured values of earlier calls.
pub trait Render {
    /// Renders `template`, returning the resolved text.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or one of its lookups
    /// cannot be resolved.
    fn render(&self, template: &str) -> Result<String, RenderError>;
}

impl<R: Render + ?Sized> Render for &R {
    fn render(&self, template: &str) -> Result<String, RenderError> {
        (**self).render(template)
    }
}
