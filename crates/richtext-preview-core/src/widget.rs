//! Preview widget state machine.
//!
//! [`PreviewWidget`] decides *what* should happen for each event on a bound
//! field; the platform layer decides *how*. Every operation returns the
//! [`Effect`]s the platform must carry out, in order:
//!
//! - panel visibility and loading indicator changes,
//! - debounce timer scheduling and cancellation,
//! - render requests to hand to a [`PreviewTransport`](crate::PreviewTransport),
//! - body content updates once a response is accepted.
//!
//! Timers and responses come back in through [`PreviewWidget::on_timer_fired`]
//! and [`PreviewWidget::on_response`]. Responses are applied in issue order:
//! anything but the latest generation is dropped.

use std::time::Duration;

use crate::error::TransportError;
use crate::mode::Mode;
use crate::session::{Fingerprint, Generation, PreviewSession, TimerId};
use crate::transport::{RenderOutcome, RenderRequest};

/// A render request tagged with its generation.
///
/// Pass it back to [`PreviewWidget::on_response`] together with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub generation: Generation,
    pub request: RenderRequest,
}

/// Non-markup content shown in the panel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The last request failed.
    Error(String),
    /// Rendering is switched off server-side.
    Disabled,
}

impl Notice {
    /// CSS class of the element holding the notice.
    pub fn class(&self) -> &'static str {
        match self {
            Notice::Error(_) => "rt-error",
            Notice::Disabled => "rt-disabled",
        }
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Notice::Error(reason) => format!("Preview error: {reason}"),
            Notice::Disabled => "Preview is disabled on this site.".to_owned(),
        }
    }
}

/// Something the platform layer must do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowPanel,
    HidePanel,
    /// Start a one-shot timer; report its firing with the same id.
    ScheduleRefresh { timer: TimerId, delay: Duration },
    /// Drop a timer that has not fired yet.
    CancelRefresh(TimerId),
    SetLoading(bool),
    /// Empty the panel body; its content no longer matches the field.
    ClearBody,
    /// Send a render request.
    Issue(RenderTicket),
    /// Replace the panel body with converted markup.
    ShowMarkup(String),
    /// Replace the panel body with a notice.
    ShowNotice(Notice),
}

/// Open/close, cache and refresh logic for one bound field.
#[derive(Debug, Clone)]
pub struct PreviewWidget {
    mode: Mode,
    debounce: Duration,
    session: PreviewSession,
}

impl PreviewWidget {
    pub fn new(mode: Mode, debounce: Duration) -> Self {
        Self {
            mode,
            debounce,
            session: PreviewSession::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> &PreviewSession {
        &self.session
    }

    /// Open a closed panel (rendering if stale) or close an open one.
    ///
    /// `text` is the field's current value.
    pub fn toggle_panel(&mut self, text: &str) -> Vec<Effect> {
        if self.session.panel_open {
            self.session.panel_open = false;
            let mut effects = vec![Effect::HidePanel];
            if let Some(timer) = self.session.pending_timer.take() {
                effects.push(Effect::CancelRefresh(timer));
            }
            tracing::debug!(mode = %self.mode, "preview panel closed");
            effects
        } else {
            self.session.panel_open = true;
            tracing::debug!(mode = %self.mode, "preview panel opened");
            let mut effects = vec![Effect::ShowPanel];
            effects.extend(self.ensure_fresh(text));
            effects
        }
    }

    /// The field was edited.
    ///
    /// The displayed content is marked stale whatever the panel state. An
    /// open panel gets a debounced refresh; a closed one costs nothing.
    pub fn on_content_changed(&mut self) -> Vec<Effect> {
        self.session.last_rendered = None;
        if !self.session.panel_open || self.session.disabled {
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(2);
        if let Some(previous) = self.session.pending_timer.take() {
            effects.push(Effect::CancelRefresh(previous));
        }
        let timer = self.session.new_timer();
        effects.push(Effect::ScheduleRefresh {
            timer,
            delay: self.debounce,
        });
        effects
    }

    /// A scheduled refresh fired.
    ///
    /// Timers that were superseded or cancelled are ignored.
    pub fn on_timer_fired(&mut self, timer: TimerId, text: &str) -> Vec<Effect> {
        if self.session.pending_timer != Some(timer) {
            tracing::trace!(timer = timer.get(), "ignoring superseded refresh timer");
            return Vec::new();
        }
        self.session.pending_timer = None;
        if !self.session.panel_open {
            return Vec::new();
        }
        self.ensure_fresh(text)
    }

    /// Request a render unless `text` is already displayed or being fetched.
    ///
    /// The body is emptied before the request goes out, so markup for older
    /// content is never visible while the new render is pending or after it
    /// fails.
    pub fn ensure_fresh(&mut self, text: &str) -> Vec<Effect> {
        if self.session.disabled || self.session.covers(text, self.mode) {
            return Vec::new();
        }

        let generation = self.session.issue(text, self.mode);
        tracing::debug!(
            generation = generation.get(),
            mode = %self.mode,
            len = text.len(),
            "issuing preview request"
        );
        vec![
            Effect::ClearBody,
            Effect::SetLoading(true),
            Effect::Issue(RenderTicket {
                generation,
                request: RenderRequest::new(text, self.mode),
            }),
        ]
    }

    /// A render request resolved.
    ///
    /// Superseded responses are dropped. Markup for the latest request is
    /// applied even if the panel has been closed since (it stays hidden);
    /// a failure is only shown while the panel is open.
    pub fn on_response(
        &mut self,
        ticket: RenderTicket,
        result: Result<RenderOutcome, TransportError>,
    ) -> Vec<Effect> {
        if ticket.generation != self.session.latest {
            tracing::debug!(
                generation = ticket.generation.get(),
                latest = self.session.latest.get(),
                "discarding superseded preview response"
            );
            return Vec::new();
        }
        self.session.in_flight = None;

        let mut effects = vec![Effect::SetLoading(false)];
        match result {
            Ok(RenderOutcome::Rendered(html)) => {
                self.session.last_rendered = Some(Fingerprint::new(
                    ticket.request.text,
                    ticket.request.mode,
                ));
                effects.push(Effect::ShowMarkup(html));
            }
            Ok(RenderOutcome::Disabled) => {
                tracing::info!("preview rendering is disabled server-side");
                self.session.disabled = true;
                self.session.last_rendered = None;
                effects.push(Effect::ShowNotice(Notice::Disabled));
            }
            Err(e) => {
                tracing::warn!(generation = ticket.generation.get(), "preview request failed: {e}");
                if self.session.panel_open {
                    effects.push(Effect::ShowNotice(Notice::Error(e.to_string())));
                }
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests;
