//! HTTP request body types
//!
//! A [`Body`] turns its source content into request bytes, rendering any
//! templates it holds through the caller's [`Render`] implementation.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{DomainError, DomainResult};
use crate::render::{Render, RenderError};

/// Content type of [`JsonBody`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of [`FormBody`].
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Errors raised while building request bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// A template inside the body failed to render.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The rendered content could not be encoded.
    #[error("cannot encode body: {0}")]
    Encode(String),
}

/// Produces the payload of a request.
pub trait Body: Send + Sync + fmt::Debug {
    /// Renders the body content and returns the request bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render or the content cannot
    /// be encoded.
    fn build(&self, renderer: &dyn Render) -> Result<Vec<u8>, BodyError>;

    /// Content type to send with the body. Empty means no header is set.
    fn content_type(&self) -> &str;
}

impl<B: Body + ?Sized> Body for Box<B> {
    fn build(&self, renderer: &dyn Render) -> Result<Vec<u8>, BodyError> {
        (**self).build(renderer)
    }

    fn content_type(&self) -> &str {
        (**self).content_type()
    }
}

/// An empty body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopBody;

impl Body for NoopBody {
    fn build(&self, _renderer: &dyn Render) -> Result<Vec<u8>, BodyError> {
        Ok(Vec::new())
    }

    fn content_type(&self) -> &str {
        ""
    }
}

/// A raw template string sent as-is once rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBody {
    template: String,
    content_type: String,
}

impl StringBody {
    /// Creates a string body without a content type.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            content_type: String::new(),
        }
    }

    /// Sets the content type sent with this body.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the unrendered template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Body for StringBody {
    fn build(&self, renderer: &dyn Render) -> Result<Vec<u8>, BodyError> {
        Ok(renderer.render(&self.template)?.into_bytes())
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// A JSON document whose string leaves and object keys are templates.
///
/// Templates are rendered leaf by leaf before serialization, so the quoting
/// inside `{{field "name" "id"}}` never collides with JSON escaping.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody {
    value: Value,
}

impl JsonBody {
    /// Creates a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::from_value)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Creates a JSON body from an already built JSON value.
    #[must_use]
    pub const fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Returns the unrendered document.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

fn render_value(value: &Value, renderer: &dyn Render) -> Result<Value, RenderError> {
    Ok(match value {
        Value::String(s) => Value::String(renderer.render(s)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_value(item, renderer))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(fields) => {
            let mut rendered = Map::with_capacity(fields.len());
            for (key, item) in fields {
                rendered.insert(renderer.render(key)?, render_value(item, renderer)?);
            }
            Value::Object(rendered)
        }
        other => other.clone(),
    })
}

impl Body for JsonBody {
    fn build(&self, renderer: &dyn Render) -> Result<Vec<u8>, BodyError> {
        let rendered = render_value(&self.value, renderer)?;
        serde_json::to_vec(&rendered).map_err(|e| BodyError::Encode(e.to_string()))
    }

    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }
}

impl From<Value> for JsonBody {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A form body sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field. Both name and value are templates.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Returns the unrendered fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormBody {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Body for FormBody {
    fn build(&self, renderer: &dyn Render) -> Result<Vec<u8>, BodyError> {
        let mut rendered = Vec::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            rendered.push((renderer.render(name)?, renderer.render(value)?));
        }
        serde_urlencoded::to_string(&rendered)
            .map(String::into_bytes)
            .map_err(|e| BodyError::Encode(e.to_string()))
    }

    fn content_type(&self) -> &str {
        FORM_CONTENT_TYPE
    }
}

/// Conversion of the accepted body inputs into a boxed [`Body`].
///
/// A non-empty string becomes a [`StringBody`], an empty string or `()`
/// becomes a [`NoopBody`], and any [`Body`] is passed through.
pub trait IntoBody {
    /// Converts `self` into a boxed body.
    fn into_body(self) -> Box<dyn Body>;
}

impl<B: Body + 'static> IntoBody for B {
    fn into_body(self) -> Box<dyn Body> {
        Box::new(self)
    }
}

impl IntoBody for &str {
    fn into_body(self) -> Box<dyn Body> {
        if self.is_empty() {
            Box::new(NoopBody)
        } else {
            Box::new(StringBody::new(self))
        }
    }
}

impl IntoBody for String {
    fn into_body(self) -> Box<dyn Body> {
        if self.is_empty() {
            Box::new(NoopBody)
        } else {
            Box::new(StringBody::new(self))
        }
    }
}

impl IntoBody for () {
    fn into_body(self) -> Box<dyn Body> {
        Box::new(NoopBody)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Replaces every `{{id}}` with `42` and fails on `{{bad}}`.
    struct FakeRenderer;

    impl Render for FakeRenderer {
        fn render(&self, template: &str) -> Result<String, RenderError> {
            if template.contains("{{bad}}") {
                return Err(RenderError::UnknownFunction("bad".to_string()));
            }
            Ok(template.replace("{{id}}", "42"))
        }
    }

    fn text(body: &dyn Body) -> String {
        String::from_utf8(body.build(&FakeRenderer).unwrap()).unwrap()
    }

    #[test]
    fn test_noop_body_is_empty() {
        assert_eq!(text(&NoopBody), "");
        assert_eq!(NoopBody.content_type(), "");
    }

    #[test]
    fn test_string_body_renders_template() {
        let body = StringBody::new("id={{id}}");
        assert_eq!(text(&body), "id=42");
        assert_eq!(body.content_type(), "");
    }

    #[test]
    fn test_string_body_content_type() {
        let body = StringBody::new("x").with_content_type("text/plain");
        assert_eq!(body.content_type(), "text/plain");
    }

    #[test]
    fn test_string_body_render_error() {
        let body = StringBody::new("{{bad}}");
        let err = body.build(&FakeRenderer).unwrap_err();
        assert!(matches!(err, BodyError::Render(RenderError::UnknownFunction(_))));
    }

    #[test]
    fn test_json_body_renders_leaves_and_keys() {
        let body = JsonBody::from_value(serde_json::json!({
            "parent": "{{id}}",
            "tags": ["a", "{{id}}"],
            "{{id}}": true,
            "count": 3
        }));

        let rendered: Value = serde_json::from_str(&text(&body)).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({
                "parent": "42",
                "tags": ["a", "42"],
                "42": true,
                "count": 3
            })
        );
        assert_eq!(body.content_type(), "application/json");
    }

    #[test]
    fn test_json_body_from_serializable() {
        #[derive(Serialize)]
        struct Item {
            name: &'static str,
        }

        let body = JsonBody::new(&Item { name: "widget" }).unwrap();
        assert_eq!(text(&body), r#"{"name":"widget"}"#);
    }

    #[test]
    fn test_form_body_encodes_rendered_fields() {
        let body = FormBody::new().field("user", "{{id}}").field("note", "a b&c");
        assert_eq!(text(&body), "user=42&note=a+b%26c");
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
    }

    #[test]
    fn test_into_body_normalizes_inputs() {
        assert_eq!("".into_body().content_type(), "");
        assert_eq!(text(&*"".into_body()), "");
        assert_eq!(text(&*"id={{id}}".into_body()), "id=42");
        assert_eq!(text(&*String::from("x").into_body()), "x");
        assert_eq!(text(&*().into_body()), "");

        let typed = StringBody::new("typed").with_content_type("text/plain").into_body();
        assert_eq!(typed.content_type(), "text/plain");
    }
}
