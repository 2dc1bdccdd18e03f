//! Admin help text as label tooltips.
//!
//! Form help blocks (`.help`, `.helptext`) are replaced by an info icon on
//! the field's label whose `title` carries the help text.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

const HELP_SELECTOR: &str = ".help, .helptext";
const ROW_SELECTORS: &[&str] = &[".form-row", ".fieldBox", ".aligned"];
pub const ICON_CLASS: &str = "lea-help-icon";
const ICON: &str = "ℹ️";

/// Convert every help block under `root`. Returns how many were converted.
///
/// Labels that already carry an icon are left alone.
pub fn attach_help_tooltips(root: &Element) -> usize {
    let nodes = match root.query_selector_all(HELP_SELECTOR) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::debug!("help lookup failed: {:?}", e);
            return 0;
        }
    };

    let mut converted = 0;
    for i in 0..nodes.length() {
        let Some(help) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        match convert(&help) {
            Ok(true) => converted += 1,
            Ok(false) => {}
            Err(e) => tracing::debug!("failed to convert help text: {:?}", e),
        }
    }
    converted
}

fn convert(help: &Element) -> Result<bool, JsValue> {
    let text = help.text_content().unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Ok(false);
    }

    let Some(row) = field_row(help)? else {
        return Ok(false);
    };
    let Some(label) = row.query_selector("label")? else {
        return Ok(false);
    };
    if label.query_selector(&format!(".{ICON_CLASS}"))?.is_some() {
        return Ok(false);
    }

    let document = label
        .owner_document()
        .ok_or_else(|| JsValue::from_str("label has no document"))?;
    let icon = document.create_element("span")?;
    icon.set_class_name(ICON_CLASS);
    icon.set_text_content(Some(ICON));
    icon.set_attribute("title", text)?;
    label.append_child(&icon)?;

    help.remove();
    Ok(true)
}

fn field_row(help: &Element) -> Result<Option<Element>, JsValue> {
    for selector in ROW_SELECTORS {
        if let Some(row) = help.closest(selector)? {
            return Ok(Some(row));
        }
    }
    Ok(help.parent_element())
}
