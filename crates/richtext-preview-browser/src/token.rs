//! Anti-forgery token lookup from the host page.

use richtext_preview_core::{TokenProvider, find_cookie};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDocument, HtmlInputElement};

/// Hidden form input carrying the token when the cookie is unavailable.
const TOKEN_INPUT_SELECTOR: &str = "input[name=csrfmiddlewaretoken]";

/// Reads the token from a cookie, falling back to the form's hidden input.
///
/// The lookup happens per request, so a token rotated mid-session is picked
/// up by the next preview.
#[derive(Debug, Clone)]
pub struct CookieTokenProvider {
    document: Document,
    cookie: String,
}

impl CookieTokenProvider {
    pub fn new(document: Document, cookie: impl Into<String>) -> Self {
        Self {
            document,
            cookie: cookie.into(),
        }
    }

    fn from_cookie(&self) -> Option<String> {
        let cookies = self.document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
        find_cookie(&cookies, &self.cookie)
    }

    fn from_form(&self) -> Option<String> {
        let input = self
            .document
            .query_selector(TOKEN_INPUT_SELECTOR)
            .ok()??
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        Some(input.value()).filter(|v| !v.is_empty())
    }
}

impl TokenProvider for CookieTokenProvider {
    fn token(&self) -> Option<String> {
        let token = self.from_cookie().or_else(|| self.from_form());
        if token.is_none() {
            tracing::debug!(cookie = %self.cookie, "no anti-forgery token on page");
        }
        token
    }
}
