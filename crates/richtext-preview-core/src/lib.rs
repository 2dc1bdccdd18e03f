//! richtext-preview-core: the preview widget without a browser.
//!
//! This crate provides:
//! - `PreviewWidget` - open/close, cache and debounce state machine for one field
//! - `FieldBinding` / `BindMarker` - idempotent attachment to a field
//! - `PreviewTransport` / `TokenProvider` - the request contract
//! - response decoding, endpoint resolution and cookie lookup
//! - `PreviewConfig` and the error types
//!
//! Platform layers execute the [`Effect`]s the widget returns and report
//! timer firings and responses back to it.

pub mod binding;
pub mod config;
pub mod cookie;
pub mod error;
pub mod mode;
pub mod session;
pub mod transport;
pub mod widget;

pub use binding::{BindMarker, BindSkip, FieldBinding};
pub use config::PreviewConfig;
pub use cookie::find_cookie;
pub use error::{ConfigError, TransportError};
pub use mode::{Mode, UnknownMode};
pub use session::{Fingerprint, Generation, InFlight, PreviewSession, TimerId};
pub use smol_str::SmolStr;
pub use transport::{
    PreviewTransport, RenderOutcome, RenderRequest, StaticToken, TokenProvider, decode_response,
    resolve_endpoint,
};
pub use widget::{Effect, Notice, PreviewWidget, RenderTicket};
