//! A single scripted request

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Method;

use super::body::{Body, IntoBody};
use crate::decode::DecodeTarget;
use crate::testing::Checker;

/// Header templates: rendered name to rendered value.
pub type Headers = BTreeMap<String, String>;

/// One request of a scenario plus the checks run against its response.
pub struct Call {
    name: String,
    method: Method,
    query: String,
    body: Box<dyn Body>,
    headers: Headers,
    checkers: Vec<Box<dyn Checker>>,
    decode_target: Option<Arc<dyn DecodeTarget>>,
}

impl Call {
    /// Creates a call.
    ///
    /// `query` is a template yielding the request path and query string.
    /// `body` accepts a template string, `()` or any [`Body`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        method: Method,
        query: impl Into<String>,
        body: impl IntoBody,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            query: query.into(),
            body: body.into_body(),
            headers: Headers::new(),
            checkers: Vec::new(),
            decode_target: None,
        }
    }

    /// Adds a header. Name and value are templates.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds several headers.
    pub fn headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Appends a checker.
    pub fn check(&mut self, checker: impl Checker + 'static) -> &mut Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Appends several boxed checkers, keeping their order.
    pub fn checks(&mut self, checkers: impl IntoIterator<Item = Box<dyn Checker>>) -> &mut Self {
        self.checkers.extend(checkers);
        self
    }

    /// Registers a typed decode target for the response body.
    pub fn decode_into(&mut self, target: impl DecodeTarget + 'static) -> &mut Self {
        self.decode_target = Some(Arc::new(target));
        self
    }

    /// Returns the call name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the unrendered query template.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &dyn Body {
        self.body.as_ref()
    }

    /// Returns the header templates.
    #[must_use]
    pub const fn header_templates(&self) -> &Headers {
        &self.headers
    }

    /// Returns the checkers in the order they run.
    #[must_use]
    pub fn checkers(&self) -> &[Box<dyn Checker>] {
        &self.checkers
    }

    /// Returns the registered decode target.
    #[must_use]
    pub fn decode_target(&self) -> Option<&dyn DecodeTarget> {
        self.decode_target.as_deref()
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("checkers", &self.checkers.len())
            .field("decode_target", &self.decode_target.is_some())
            .finish()
    }
}
