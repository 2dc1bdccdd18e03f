//! Browser DOM layer for the rich text preview widget.
//!
//! This crate binds `richtext-preview-core` widgets to form fields, executes
//! their effects against the DOM, and talks to the preview endpoint. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `field`: recognising text controls and their data attributes
//! - `panel`: toggle control and panel elements
//! - `widget`: effect execution, debounce timers, request spawning
//! - `transport`: form-encoded POST with the anti-forgery token
//! - `token`: cookie / hidden input token lookup
//! - `registry`: discovery of marked fields
//! - `tooltips`: admin help text as label icons
//! - `logging`: console subscriber and panic hook
//!
//! # Entry points
//!
//! The host page either calls `start()` once, which waits for the document
//! to load, or calls `initialize()` / `initializeWithConfig()` itself from
//! its own startup code.
//!
//! # Re-exports
//!
//! This crate re-exports `richtext-preview-core` for convenience.

use std::cell::RefCell;

use gloo_events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

// Re-export core crate
pub use richtext_preview_core;
pub use richtext_preview_core::*;

pub mod field;
pub mod logging;
pub mod panel;
pub mod registry;
pub mod token;
pub mod tooltips;
pub mod transport;
pub mod widget;

pub use field::FieldControl;
pub use panel::PanelDom;
pub use registry::{PageWidget, WidgetRegistry};
pub use token::CookieTokenProvider;
pub use tooltips::attach_help_tooltips;
pub use transport::HttpTransport;
pub use widget::BrowserWidget;

/// Page-level override of the default endpoint.
const ENDPOINT_GLOBAL: &str = "RICHTEXT_PREVIEW_URL";

thread_local! {
    static REGISTRY: RefCell<Option<WidgetRegistry>> = const { RefCell::new(None) };
}

/// Default configuration with the page's endpoint override applied.
pub fn page_config() -> PreviewConfig {
    let config = PreviewConfig::default();
    let Some(window) = web_sys::window() else {
        return config;
    };
    match js_sys::Reflect::get(&window, &JsValue::from_str(ENDPOINT_GLOBAL)) {
        Ok(value) => match value.as_string() {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        },
        Err(_) => config,
    }
}

fn default_root(document: &Document) -> Option<Element> {
    document
        .body()
        .map(Element::from)
        .or_else(|| document.document_element())
}

fn run_registry(config: Option<PreviewConfig>, root: Option<Element>) -> usize {
    let root = match root {
        Some(root) => root,
        None => match web_sys::window().and_then(|w| w.document()).as_ref().and_then(default_root) {
            Some(root) => root,
            None => {
                tracing::warn!("no document to scan for rich text fields");
                return 0;
            }
        },
    };

    REGISTRY.with(|cell| {
        let mut slot = cell.borrow_mut();
        let registry = slot.get_or_insert_with(|| WidgetRegistry::new(page_config()));
        if let Some(config) = config {
            registry.set_config(config);
        }
        registry.initialize(&root)
    })
}

/// Bind previews to marked fields under `root` (the body by default).
///
/// Fields bound by an earlier call are skipped. Returns how many fields were
/// bound.
#[wasm_bindgen]
pub fn initialize(root: Option<Element>) -> usize {
    run_registry(None, root)
}

/// Like [`initialize`], with settings from a (possibly partial) config
/// object, e.g. `{ endpoint: "/_richtext/preview/", debounce_ms: 300 }`.
#[wasm_bindgen(js_name = initializeWithConfig)]
pub fn initialize_with_config(config: JsValue, root: Option<Element>) -> Result<usize, JsValue> {
    let config: PreviewConfig = serde_wasm_bindgen::from_value(config)?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(run_registry(Some(config), root))
}

/// Install logging, then initialize previews and help tooltips once the
/// document has loaded.
#[wasm_bindgen]
pub fn start() {
    logging::init();

    let document = gloo_utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| init_page()).forget();
    } else {
        init_page();
    }
}

fn init_page() {
    let bound = initialize(None);
    let tooltips = default_root(&gloo_utils::document())
        .map(|root| attach_help_tooltips(&root))
        .unwrap_or(0);
    tracing::info!(bound, tooltips, "rich text admin helpers ready");
}
