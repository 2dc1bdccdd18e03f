//! Text controls a preview can be bound to.

use richtext_preview_core::{BindMarker, Mode};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

/// Attribute recording that a field has a widget.
pub const BOUND_ATTR: &str = "data-rt-bound";
/// Attribute recording the mode the field was bound with.
pub const BOUND_MODE_ATTR: &str = "data-rt-mode";
/// Host-provided mode of a field.
pub const MODE_ATTR: &str = "data-richtext-mode";
/// Host-provided per-field endpoint.
pub const PREVIEW_URL_ATTR: &str = "data-richtext-preview-url";

/// Input types whose value is free text.
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "url", "email", ""];

/// A recognised text control.
///
/// The widget only ever reads the control's value.
#[derive(Debug, Clone)]
pub enum FieldControl {
    TextArea(HtmlTextAreaElement),
    Input(HtmlInputElement),
}

impl FieldControl {
    /// Recognise a `<textarea>` or text-like `<input>`.
    pub fn from_element(element: &Element) -> Option<Self> {
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(FieldControl::TextArea(area.clone()));
        }
        let input = element.dyn_ref::<HtmlInputElement>()?;
        let kind = input.type_().to_ascii_lowercase();
        TEXT_INPUT_TYPES
            .iter()
            .any(|t| *t == kind)
            .then(|| FieldControl::Input(input.clone()))
    }

    pub fn element(&self) -> &HtmlElement {
        match self {
            FieldControl::TextArea(area) => area,
            FieldControl::Input(input) => input,
        }
    }

    /// Current text of the control.
    pub fn value(&self) -> String {
        match self {
            FieldControl::TextArea(area) => area.value(),
            FieldControl::Input(input) => input.value(),
        }
    }

    /// Mode from `data-richtext-mode`, `block` if absent.
    pub fn mode(&self) -> Mode {
        Mode::from_attr(self.element().get_attribute(MODE_ATTR).as_deref())
    }

    /// Endpoint override from `data-richtext-preview-url`.
    pub fn preview_url(&self) -> Option<String> {
        self.element()
            .get_attribute(PREVIEW_URL_ATTR)
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
    }

    /// Container the preview box is appended to: the closest `.form-row`,
    /// else the parent element.
    pub fn row(&self) -> Option<Element> {
        let element = self.element();
        match element.closest(".form-row") {
            Ok(Some(row)) => Some(row),
            _ => element.parent_element(),
        }
    }
}

impl BindMarker for FieldControl {
    fn is_bound(&self) -> bool {
        self.element().get_attribute(BOUND_ATTR).as_deref() == Some("1")
    }

    fn mark_bound(&self, mode: Mode) {
        let element = self.element();
        if let Err(e) = element
            .set_attribute(BOUND_ATTR, "1")
            .and_then(|()| element.set_attribute(BOUND_MODE_ATTR, mode.as_str()))
        {
            tracing::warn!("failed to mark field as bound: {:?}", e);
        }
    }
}
