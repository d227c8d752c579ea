//! Value store and template evaluation
//!
//! Every response body is recorded under the name of the call that produced
//! it. Templates of later calls read those values back with `field` and
//! `json` actions.

use std::collections::{BTreeMap, HashMap};

use iffy_domain::{NO_VALUE, Render, RenderError};
use serde_json::{Map, Value};
use tracing::debug;

use super::parser::{Function, Segment, parse_template};

/// A recorded response body. `None` when the body was not a JSON object.
pub type Entry = Option<Map<String, Value>>;

/// Response values captured during a run, keyed by call name.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: HashMap<String, Entry>,
}

impl ValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a response body under `name`.
    ///
    /// Bodies that are not a JSON object are recorded without a value, so the
    /// name is known but every lookup into it yields `<no value>`.
    pub fn record(&mut self, name: &str, body: &[u8]) {
        let entry = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) | Err(_) => None,
        };
        self.insert(name, entry);
    }

    /// Stores `entry` under `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) {
        let name = name.into();
        if self.values.contains_key(&name) {
            debug!(call = %name, "replacing captured values");
        }
        self.values.insert(name, entry);
    }

    /// Returns the object recorded under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Returns true if an entry exists for `name`, even one without a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the recorded names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves `path` and formats it as text.
    ///
    /// Strings are returned raw, missing values as `<no value>` and anything
    /// else as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment addresses a value that is not a map.
    pub fn field(&self, path: &[&str]) -> Result<String, RenderError> {
        match self.resolve(path)? {
            Cursor::Root(_) => self.root_json(),
            Cursor::Object(Some(map)) => to_json(map),
            Cursor::Object(None) | Cursor::Missing | Cursor::Value(Value::Null) => {
                Ok(NO_VALUE.to_string())
            }
            Cursor::Value(Value::String(text)) => Ok(text.clone()),
            Cursor::Value(value) => to_json(value),
        }
    }

    /// Resolves `path` and formats it as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment addresses a value that is not a map.
    pub fn json(&self, path: &[&str]) -> Result<String, RenderError> {
        match self.resolve(path)? {
            Cursor::Root(_) => self.root_json(),
            Cursor::Object(Some(map)) => to_json(map),
            Cursor::Object(None) => Ok("null".to_string()),
            Cursor::Missing => to_json(NO_VALUE),
            Cursor::Value(value) => to_json(value),
        }
    }

    /// Renders `template` against the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or a lookup fails.
    pub fn apply(&self, template: &str) -> Result<String, RenderError> {
        let segments = parse_template(template)?;
        let mut output = String::with_capacity(template.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Action(action) => {
                    let path: Vec<&str> = action.args.iter().map(String::as_str).collect();
                    let value = match action.function {
                        Function::Field => self.field(&path)?,
                        Function::Json => self.json(&path)?,
                    };
                    output.push_str(&value);
                }
            }
        }
        Ok(output)
    }

    fn resolve(&self, path: &[&str]) -> Result<Cursor<'_>, RenderError> {
        path.iter()
            .try_fold(Cursor::Root(&self.values), |cursor, key| cursor.step(key))
    }

    fn root_json(&self) -> Result<String, RenderError> {
        let sorted: BTreeMap<_, _> = self.values.iter().collect();
        to_json(&sorted)
    }
}

impl Render for ValueStore {
    fn render(&self, template: &str) -> Result<String, RenderError> {
        self.apply(template)
    }
}

/// Position reached while walking a lookup path.
enum Cursor<'a> {
    Root(&'a HashMap<String, Entry>),
    Object(Option<&'a Map<String, Value>>),
    Value(&'a Value),
    Missing,
}

impl<'a> Cursor<'a> {
    fn lift(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(Some(map)),
            other => Self::Value(other),
        }
    }

    fn step(self, key: &str) -> Result<Self, RenderError> {
        match self {
            Self::Root(values) => Ok(values
                .get(key)
                .map_or(Self::Missing, |entry| Self::Object(entry.as_ref()))),
            Self::Object(Some(map)) => Ok(map.get(key).map_or(Self::Missing, Self::lift)),
            Self::Object(None) => Ok(Self::Missing),
            Self::Missing => Err(RenderError::Dereference {
                key: key.to_string(),
                found: NO_VALUE,
            }),
            Self::Value(value) => Err(RenderError::Dereference {
                key: key.to_string(),
                found: kind(value),
            }),
        }
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    serde_json::to_string(value).map_err(|e| RenderError::Serialize(e.to_string()))
}
