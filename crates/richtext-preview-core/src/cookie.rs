//! Cookie header lookup for the anti-forgery token.

use percent_encoding::percent_decode_str;

/// Find a cookie by name in a `document.cookie`-style string.
///
/// The value is percent-decoded. Missing and empty cookies both yield `None`.
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}
