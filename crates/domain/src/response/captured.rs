//! Captured response type
//!
//! Holds what the handler produced for one call: status, headers, body text
//! and the optional typed decode.

use std::any::Any;

use http::{HeaderMap, StatusCode};

use crate::decode::Decoded;
use crate::testing::{DEFAULT_PREVIEW_LIMIT, preview};

/// A response as seen by checkers.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    decoded: Option<Decoded>,
    preview_limit: usize,
}

impl CapturedResponse {
    /// Creates a captured response. Non UTF-8 body bytes are replaced lossily.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: &[u8]) -> Self {
        Self {
            status,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
            decoded: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }

    /// Attaches the typed decode of the body.
    #[must_use]
    pub fn with_decoded(mut self, decoded: Decoded) -> Self {
        self.decoded = Some(decoded);
        self
    }

    /// Sets how many body characters failure messages may quote.
    #[must_use]
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the response body as text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the body truncated to the preview limit.
    #[must_use]
    pub fn body_preview(&self) -> String {
        preview(&self.body, self.preview_limit)
    }

    /// Returns the typed decode, if the call registered a target of type `T`.
    #[must_use]
    pub fn decoded<T: Any>(&self) -> Option<&T> {
        self.decoded.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    /// Returns true if a typed decode is attached.
    #[must_use]
    pub const fn has_decoded(&self) -> bool {
        self.decoded.is_some()
    }
}
