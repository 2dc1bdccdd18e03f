//! Attaching a preview widget to a field exactly once.

use crate::config::PreviewConfig;
use crate::mode::Mode;
use crate::widget::PreviewWidget;

/// Platform-side record of whether a field already has a widget.
///
/// The browser keeps this on the element itself, so the flag survives
/// repeated initialization passes over the same document.
pub trait BindMarker {
    fn is_bound(&self) -> bool;

    /// Record the binding. Never undone.
    fn mark_bound(&self, mode: Mode);
}

/// Why a field was left alone. Not reported to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindSkip {
    /// The field already has a widget.
    AlreadyBound,
    /// The element is not a text control, or has nowhere to attach.
    Ineligible,
}

/// One managed field: its mode and the widget that owns its session.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    mode: Mode,
    widget: PreviewWidget,
}

impl FieldBinding {
    /// Bind a field, or skip it if it is already bound.
    ///
    /// `setup` builds whatever the platform attaches next to the field. The
    /// field is only marked once it succeeds, so a failed setup leaves it
    /// free for a later pass.
    pub fn attach<R>(
        marker: &impl BindMarker,
        mode: Mode,
        config: &PreviewConfig,
        setup: impl FnOnce() -> Result<R, BindSkip>,
    ) -> Result<(Self, R), BindSkip> {
        if marker.is_bound() {
            return Err(BindSkip::AlreadyBound);
        }
        let attached = setup()?;
        marker.mark_bound(mode);
        let binding = Self {
            mode,
            widget: PreviewWidget::new(mode, config.debounce()),
        };
        Ok((binding, attached))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn widget(&self) -> &PreviewWidget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut PreviewWidget {
        &mut self.widget
    }
}
