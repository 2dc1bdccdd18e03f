//! Preview transport contract.
//!
//! The widget never talks to the network directly. It hands a
//! [`RenderRequest`] to a [`PreviewTransport`] and feeds the result back into
//! the state machine. This module also holds the pieces of the wire contract
//! that do not depend on a particular HTTP client: form fields, endpoint
//! resolution and response decoding.

use std::future::Future;

use serde::Deserialize;
use url::Url;

use crate::error::TransportError;
use crate::mode::Mode;

/// Text and mode to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub text: String,
    pub mode: Mode,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>, mode: Mode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    /// Form-encoded body fields, in wire order.
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("text", self.text.as_str()), ("mode", self.mode.as_str())]
    }
}

/// Successful answer from the preview endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Converted markup, possibly empty.
    Rendered(String),
    /// Rendering is switched off server-side.
    Disabled,
}

/// Source of the anti-forgery token attached to every request.
pub trait TokenProvider {
    /// Current token, if the page has one.
    fn token(&self) -> Option<String>;
}

/// A token known up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String>,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Issues preview requests.
///
/// Implementations must reject non-success statuses, undecodable bodies and
/// timeouts with a [`TransportError`]. Empty text is a normal request.
pub trait PreviewTransport {
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = Result<RenderOutcome, TransportError>>;
}

/// Resolve a possibly relative endpoint against the page URL.
pub fn resolve_endpoint(page_url: &str, endpoint: &str) -> Result<Url, TransportError> {
    let invalid = || TransportError::InvalidEndpoint(endpoint.to_owned());
    if endpoint.trim().is_empty() {
        return Err(invalid());
    }
    match Url::parse(endpoint) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url)
            .and_then(|base| base.join(endpoint))
            .map_err(|_| invalid()),
        Err(_) => Err(invalid()),
    }
}

#[derive(Debug, Deserialize)]
struct PreviewPayload {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    html: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

/// Decode an endpoint response.
///
/// JSON bodies (by content type) carry `html` and an optional `enabled`
/// flag; anything else is taken as raw markup.
pub fn decode_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<RenderOutcome, TransportError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::status(status, body));
    }

    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Ok(RenderOutcome::Rendered(body.to_owned()));
    }

    let payload: PreviewPayload =
        serde_json::from_str(body).map_err(|e| TransportError::Malformed(e.to_string()))?;
    if !payload.enabled {
        return Ok(RenderOutcome::Disabled);
    }
    Ok(RenderOutcome::Rendered(payload.html.unwrap_or_default()))
}
