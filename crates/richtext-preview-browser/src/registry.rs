//! Discovery of eligible fields.

use richtext_preview_core::{BindMarker, BindSkip, PreviewConfig, resolve_endpoint};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::field::FieldControl;
use crate::token::CookieTokenProvider;
use crate::transport::HttpTransport;
use crate::widget::BrowserWidget;

/// Widget type created for discovered fields.
pub type PageWidget = BrowserWidget<HttpTransport<CookieTokenProvider>>;

/// Binds one widget per marked field and keeps them alive.
pub struct WidgetRegistry {
    config: PreviewConfig,
    widgets: Vec<PageWidget>,
}

impl WidgetRegistry {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            widgets: Vec::new(),
        }
    }

    /// Settings for fields bound from now on; existing widgets keep theirs.
    pub fn set_config(&mut self, config: PreviewConfig) {
        self.config = config;
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Bind every marked field under `root` that is not bound yet.
    ///
    /// Safe to call repeatedly; returns how many fields were bound by this
    /// pass.
    pub fn initialize(&mut self, root: &Element) -> usize {
        let Some(document) = root.owner_document() else {
            return 0;
        };
        let selector = self.config.marker_selector();
        let nodes = match root.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(%selector, "field lookup failed: {:?}", e);
                return 0;
            }
        };

        let before = self.widgets.len();
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            match self.bind(&document, &element) {
                Ok(widget) => self.widgets.push(widget),
                Err(skip) => tracing::trace!(?skip, "skipping field"),
            }
        }

        let bound = self.widgets.len() - before;
        tracing::debug!(bound, total = self.widgets.len(), "rich text previews initialized");
        bound
    }

    fn bind(&self, document: &Document, element: &Element) -> Result<PageWidget, BindSkip> {
        let field = FieldControl::from_element(element).ok_or(BindSkip::Ineligible)?;
        if field.is_bound() {
            return Err(BindSkip::AlreadyBound);
        }

        let endpoint = field
            .preview_url()
            .unwrap_or_else(|| self.config.endpoint.clone());
        let page_url = document.url().unwrap_or_default();
        let endpoint = resolve_endpoint(&page_url, &endpoint).map_err(|e| {
            tracing::warn!("{e}");
            BindSkip::Ineligible
        })?;

        let tokens = CookieTokenProvider::new(document.clone(), self.config.token_cookie.clone());
        let transport = HttpTransport::new(endpoint, &self.config, tokens);
        BrowserWidget::bind(document, field, &self.config, transport)
    }
}
