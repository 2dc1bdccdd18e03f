//! Error types for preview rendering and configuration.

use miette::Diagnostic;

/// Failure of a single preview request.
///
/// Every variant is recoverable: the widget shows the message inline in its
/// panel and the next open or edit is the retry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    #[diagnostic(code(richtext_preview::transport::network))]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    #[diagnostic(code(richtext_preview::transport::status))]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed preview response: {0}")]
    #[diagnostic(code(richtext_preview::transport::malformed))]
    Malformed(String),

    /// No response within the configured timeout.
    #[error("preview request timed out after {0} ms")]
    #[diagnostic(code(richtext_preview::transport::timeout))]
    Timeout(u64),

    /// The endpoint could not be resolved to an absolute URL.
    #[error("invalid preview endpoint `{0}`")]
    #[diagnostic(
        code(richtext_preview::transport::endpoint),
        help("set data-richtext-preview-url or RICHTEXT_PREVIEW_URL to a valid path")
    )]
    InvalidEndpoint(String),
}

impl TransportError {
    /// Build a status error, using the response body as the message when it
    /// has one.
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("Preview request failed ({status})")
        } else {
            body.to_string()
        };
        TransportError::Status { status, message }
    }
}

/// Invalid preview configuration.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("preview endpoint must not be empty")]
    #[diagnostic(code(richtext_preview::config::endpoint))]
    EmptyEndpoint,

    #[error("`{0}` must be greater than zero")]
    #[diagnostic(code(richtext_preview::config::zero))]
    Zero(&'static str),

    #[error("`{0}` must not be empty")]
    #[diagnostic(code(richtext_preview::config::empty))]
    Empty(&'static str),

    #[error(transparent)]
    #[diagnostic(code(richtext_preview::config::parse))]
    Parse(#[from] serde_json::Error),
}
