//! Rendering mode for a bound field.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Rendering context a field is bound with.
///
/// The mode is sent with every preview request and picks the short markup
/// cheat-sheet shown on the toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Single-line content: emphasis, code spans and links only.
    Inline,
    /// Full block content: paragraphs, lists, quotes, code blocks.
    #[default]
    Block,
}

/// A mode tag that is neither `inline` nor `block`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
#[error("unknown rich text mode `{0}`")]
#[diagnostic(code(richtext_preview::mode))]
pub struct UnknownMode(pub SmolStr);

impl Mode {
    /// Wire and attribute representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Inline => "inline",
            Mode::Block => "block",
        }
    }

    /// Resolve the mode from a field's data attribute.
    ///
    /// Missing, blank or unrecognised values fall back to [`Mode::Block`].
    pub fn from_attr(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Mode::default();
        };
        match raw.parse() {
            Ok(mode) => mode,
            Err(e) => {
                tracing::debug!("{e}, falling back to block");
                Mode::default()
            }
        }
    }

    /// Markup cheat-sheet for this mode.
    pub fn guidance(self) -> &'static str {
        match self {
            Mode::Inline => "Inline Markdown: *italic*, **bold**, `code`, [text](url)",
            Mode::Block => {
                "Markdown: **bold**, *italic*, [text](url), lists (- item), > quotes, ``` code blocks"
            }
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("inline") {
            Ok(Mode::Inline)
        } else if s.eq_ignore_ascii_case("block") {
            Ok(Mode::Block)
        } else {
            Err(UnknownMode(SmolStr::new(s)))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
