//! DOM elements owned by one preview widget.
//!
//! ```html
//! <div class="rt-preview-box [is-open]">
//!   <button type="button" class="button rt-preview-btn" aria-expanded="false">Preview</button>
//!   <div class="rt-preview-panel" hidden>
//!     <div class="rt-preview-body [rt-loading]">…</div>
//!   </div>
//! </div>
//! ```
//!
//! Only these elements are ever mutated; the bound field is left untouched.

use richtext_preview_core::Notice;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

pub const BOX_CLASS: &str = "rt-preview-box";
pub const BUTTON_CLASS: &str = "button rt-preview-btn";
pub const PANEL_CLASS: &str = "rt-preview-panel";
pub const BODY_CLASS: &str = "rt-preview-body";
pub const ROW_CLASS: &str = "rt-row";
pub const OPEN_CLASS: &str = "is-open";
pub const LOADING_CLASS: &str = "rt-loading";

/// Toggle control, panel and render target for one field.
pub struct PanelDom {
    container: Element,
    button: HtmlButtonElement,
    panel: HtmlElement,
    body: Element,
}

impl PanelDom {
    /// Build the elements and append them to `row`.
    ///
    /// The toggle's tooltip carries the mode's markup cheat-sheet.
    pub fn build(
        document: &Document,
        row: &Element,
        label: &str,
        guidance: &str,
    ) -> Result<Self, JsValue> {
        let container = document.create_element("div")?;
        container.set_class_name(BOX_CLASS);

        let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
        button.set_type("button");
        button.set_class_name(BUTTON_CLASS);
        button.set_text_content(Some(label));
        button.set_title(guidance);
        button.set_attribute("aria-expanded", "false")?;

        let panel: HtmlElement = document.create_element("div")?.dyn_into()?;
        panel.set_class_name(PANEL_CLASS);
        panel.set_hidden(true);

        let body = document.create_element("div")?;
        body.set_class_name(BODY_CLASS);

        panel.append_child(&body)?;
        container.append_child(&button)?;
        container.append_child(&panel)?;

        row.append_child(&container)?;
        if let Err(e) = row.class_list().add_1(ROW_CLASS) {
            tracing::debug!("failed to mark preview row: {:?}", e);
        }

        Ok(Self {
            container,
            button,
            panel,
            body,
        })
    }

    pub fn button(&self) -> &HtmlButtonElement {
        &self.button
    }

    pub fn is_open(&self) -> bool {
        !self.panel.hidden()
    }

    pub fn set_open(&self, open: bool) {
        self.panel.set_hidden(!open);
        let classes = self.container.class_list();
        let toggled = if open {
            classes.add_1(OPEN_CLASS)
        } else {
            classes.remove_1(OPEN_CLASS)
        };
        if let Err(e) = toggled.and_then(|()| {
            self.button
                .set_attribute("aria-expanded", if open { "true" } else { "false" })
        }) {
            tracing::debug!("failed to update panel state: {:?}", e);
        }
    }

    pub fn set_loading(&self, loading: bool) {
        let classes = self.body.class_list();
        let result = if loading {
            classes.add_1(LOADING_CLASS)
        } else {
            classes.remove_1(LOADING_CLASS)
        };
        if let Err(e) = result {
            tracing::debug!("failed to toggle loading class: {:?}", e);
        }
    }

    pub fn clear_body(&self) {
        self.body.set_inner_html("");
    }

    /// Replace the body with server-rendered markup.
    pub fn show_markup(&self, html: &str) {
        self.body.set_inner_html(html);
    }

    /// Replace the body with a notice, inserted as text.
    pub fn show_notice(&self, notice: &Notice) {
        self.clear_body();
        let Some(document) = self.body.owner_document() else {
            return;
        };
        let result = document.create_element("div").and_then(|div| {
            div.set_class_name(notice.class());
            div.set_text_content(Some(&notice.message()));
            self.body.append_child(&div).map(|_| ())
        });
        if let Err(e) = result {
            tracing::warn!("failed to show preview notice: {:?}", e);
        }
    }
}
