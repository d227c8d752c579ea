//! Runner Settings Domain Model
//!
//! Defines how a scenario run builds requests and what it logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::testing::DEFAULT_PREVIEW_LIMIT;

/// Settings applied to every call of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Header templates added to every request before the call's own headers.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,

    /// Content type used when a non-empty body declares none.
    #[serde(default)]
    pub default_content_type: Option<String>,

    /// Whether request and response bodies are logged at trace level.
    #[serde(default)]
    pub log_bodies: bool,

    /// Maximum characters of a body shown in logs and failure messages.
    #[serde(default = "default_body_preview_limit")]
    pub body_preview_limit: usize,
}

const fn default_body_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

impl RunnerSettings {
    /// Adds a default header template.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Sets the fallback content type.
    #[must_use]
    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = Some(content_type.into());
        self
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            default_headers: BTreeMap::new(),
            default_content_type: None,
            log_bodies: false,
            body_preview_limit: default_body_preview_limit(),
        }
    }
}
