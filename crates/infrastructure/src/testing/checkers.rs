//! Built-in checkers.
//!
//! Each constructor captures its expectation and returns a [`Checker`] that can
//! be attached to a call with `Call::check`.

use std::any::{Any, type_name};

use iffy_domain::{CapturedResponse, CheckError, Checker};
use mime::Mime;
use regex::Regex;
use serde_json::{Map, Value};

/// Fails unless the response status equals `code`.
#[must_use]
pub fn expect_status(code: u16) -> impl Checker {
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let actual = response.status().as_u16();
        if actual == code {
            Ok(())
        } else {
            Err(CheckError::Status {
                expected: code,
                actual,
            })
        }
    }
}

/// Fails unless the body is a JSON object holding every named top-level key.
pub fn expect_json_fields<I, S>(fields: I) -> impl Checker
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let object: Map<String, Value> = serde_json::from_str(response.body())?;
        match fields.iter().find(|field| !object.contains_key(field.as_str())) {
            Some(missing) => Err(CheckError::MissingField(missing.clone())),
            None => Ok(()),
        }
    }
}

/// Fails unless the body is a JSON list of exactly `length` elements.
#[must_use]
pub fn expect_list_length(length: usize) -> impl Checker {
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let list: Vec<Value> = serde_json::from_str(response.body())?;
        if list.len() == length {
            Ok(())
        } else {
            Err(CheckError::ListLength {
                expected: length,
                actual: list.len(),
            })
        }
    }
}

/// Fails unless the body is a JSON list with at least one element.
///
/// # Errors
///
/// Returns an error if the body is not a list or the list is empty.
pub fn expect_list_non_empty(response: &CapturedResponse) -> Result<(), CheckError> {
    let list: Vec<Value> = serde_json::from_str(response.body())?;
    if list.is_empty() {
        Err(CheckError::EmptyList)
    } else {
        Ok(())
    }
}

/// Walks nested objects along `nodes`.
///
/// Every node must exist. When the value reached at the next-to-last node is
/// not an object, its text form must equal the last node:
/// `["user", "name", "ada"]` passes for `{"user": {"name": "ada"}}`.
/// Otherwise reaching the end of the path is enough.
pub fn expect_json_branch<I, S>(nodes: I) -> impl Checker
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let nodes: Vec<String> = nodes.into_iter().map(Into::into).collect();
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let root: Map<String, Value> = serde_json::from_str(response.body())?;
        let mut current = &root;
        for (i, node) in nodes.iter().enumerate() {
            let Some(value) = current.get(node) else {
                return Err(CheckError::MissingNode(node.clone()));
            };
            match value {
                Value::Object(child) => current = child,
                leaf if i + 2 == nodes.len() => {
                    let expected = &nodes[i + 1];
                    let actual = text_form(leaf);
                    return if actual == *expected {
                        Ok(())
                    } else {
                        Err(CheckError::WrongValue {
                            expected: expected.clone(),
                            actual,
                        })
                    };
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn text_form(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.as_f64().map_or_else(|| number.to_string(), number_form),
        other => other.to_string(),
    }
}

/// Formats a JSON number as its shortest decimal, switching to exponent
/// notation below 1e-4 and from 1e21 up: `7.0` gives `7`, `1e21` gives `1e+21`.
fn number_form(number: f64) -> String {
    let scientific = format!("{number:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return number.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if (-4..21).contains(&exponent) {
        number.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Fails unless header `name` is present and, when `value` is given, equal to it.
pub fn expect_header(name: impl Into<String>, value: Option<&str>) -> impl Checker {
    let name = name.into();
    let value = value.map(ToString::to_string);
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let actual = response
            .header(&name)
            .ok_or_else(|| CheckError::MissingHeader(name.clone()))?;
        match &value {
            Some(expected) if actual != expected.as_str() => Err(CheckError::HeaderMismatch {
                name: name.clone(),
                expected: expected.clone(),
                actual: actual.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Fails unless the content type contains `fragment`, compared case-insensitively
/// against the media type without its parameters.
pub fn expect_content_type(fragment: impl Into<String>) -> impl Checker {
    let fragment = fragment.into().to_ascii_lowercase();
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let name = http::header::CONTENT_TYPE.as_str();
        let actual = response
            .header(name)
            .ok_or_else(|| CheckError::MissingHeader(name.to_string()))?;
        let essence = actual.parse::<Mime>().map_or_else(
            |_| actual.to_ascii_lowercase(),
            |mime| mime.essence_str().to_string(),
        );
        if essence.contains(&fragment) {
            Ok(())
        } else {
            Err(CheckError::HeaderMismatch {
                name: name.to_string(),
                expected: fragment.clone(),
                actual: actual.to_string(),
            })
        }
    }
}

/// Fails unless the body contains `text`.
pub fn expect_body_contains(text: impl Into<String>) -> impl Checker {
    let text = text.into();
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        if response.body().contains(&text) {
            Ok(())
        } else {
            Err(CheckError::BodyMismatch {
                expectation: format!("body does not contain '{text}'"),
                preview: response.body_preview(),
            })
        }
    }
}

/// Fails unless the body matches `pattern`. An invalid pattern fails every check.
pub fn expect_body_matches(pattern: impl Into<String>) -> impl Checker {
    let pattern = pattern.into();
    let regex = Regex::new(&pattern).map_err(|e| e.to_string());
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let regex = regex.as_ref().map_err(|e| {
            CheckError::custom(format!("invalid regex pattern '{pattern}': {e}"))
        })?;
        if regex.is_match(response.body()) {
            Ok(())
        } else {
            Err(CheckError::BodyMismatch {
                expectation: format!("body does not match pattern '{pattern}'"),
                preview: response.body_preview(),
            })
        }
    }
}

/// Runs `predicate` over the typed decode of the response.
///
/// Fails with [`CheckError::NotDecoded`] if the call registered no decode
/// target of type `T`.
pub fn expect_decoded<T, F>(predicate: F) -> impl Checker
where
    T: Any,
    F: Fn(&T) -> Result<(), CheckError> + Send + Sync,
{
    move |response: &CapturedResponse| -> Result<(), CheckError> {
        let decoded = response
            .decoded::<T>()
            .ok_or(CheckError::NotDecoded(type_name::<T>()))?;
        predicate(decoded)
    }
}
