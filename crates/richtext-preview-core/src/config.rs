//! Preview widget configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Endpoint used when neither the page nor the field names one.
pub const DEFAULT_ENDPOINT: &str = "/admin/richtext/preview/";

/// Quiet period after the last edit before an open panel refreshes.
pub const DEFAULT_DEBOUNCE_MS: u32 = 250;

/// Request timeout; expiry is reported as a transport failure.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Settings shared by every widget a registry creates.
///
/// Unset fields take their defaults, so a host page can pass a partial
/// object such as `{ "endpoint": "/_richtext/preview/" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Preview endpoint, absolute or relative to the page URL.
    pub endpoint: String,
    /// Debounce interval for refreshes while the panel is open.
    pub debounce_ms: u32,
    /// Per-request timeout.
    pub timeout_ms: u32,
    /// Cookie holding the anti-forgery token.
    pub token_cookie: String,
    /// Header the token is sent in.
    pub token_header: String,
    /// Class marking fields eligible for preview.
    pub marker_class: String,
    /// Label of the toggle control.
    pub panel_label: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            token_cookie: "csrftoken".to_owned(),
            token_header: "X-CSRFToken".to_owned(),
            marker_class: "js-richtext".to_owned(),
            panel_label: "Preview".to_owned(),
        }
    }
}

impl PreviewConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the endpoint, ignoring blank values.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        if !endpoint.trim().is_empty() {
            self.endpoint = endpoint.trim().to_owned();
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.into())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.into())
    }

    /// CSS selector matching eligible fields.
    pub fn marker_selector(&self) -> String {
        format!(".{}", self.marker_class)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::Zero("debounce_ms"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Zero("timeout_ms"));
        }
        if self.token_header.trim().is_empty() {
            return Err(ConfigError::Empty("token_header"));
        }
        if self.marker_class.trim().is_empty() {
            return Err(ConfigError::Empty("marker_class"));
        }
        Ok(())
    }
}
