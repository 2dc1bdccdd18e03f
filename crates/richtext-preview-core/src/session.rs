//! Per-field preview session state.

use crate::mode::Mode;

/// Tag of an issued render request. Only the latest one may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Handle of a scheduled refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Text and mode of rendered (or requested) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub text: String,
    pub mode: Mode,
}

impl Fingerprint {
    pub fn new(text: impl Into<String>, mode: Mode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    pub fn matches(&self, text: &str, mode: Mode) -> bool {
        self.mode == mode && self.text == text
    }
}

/// The request the session is currently waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight {
    pub generation: Generation,
    pub fingerprint: Fingerprint,
}

/// Mutable state of one bound field's preview.
///
/// Owned by exactly one [`PreviewWidget`](crate::PreviewWidget) and only
/// touched from that widget's handlers.
#[derive(Debug, Clone, Default)]
pub struct PreviewSession {
    pub(crate) panel_open: bool,
    pub(crate) last_rendered: Option<Fingerprint>,
    pub(crate) pending_timer: Option<TimerId>,
    pub(crate) latest: Generation,
    pub(crate) in_flight: Option<InFlight>,
    pub(crate) disabled: bool,
    next_timer: u64,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.panel_open
    }

    /// Fingerprint of the content currently in the panel body.
    pub fn last_rendered(&self) -> Option<&Fingerprint> {
        self.last_rendered.as_ref()
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending_timer
    }

    /// Generation of the most recently issued request.
    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Whether the server has reported rendering as switched off.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Content is fresh if it is displayed or already being fetched.
    pub(crate) fn covers(&self, text: &str, mode: Mode) -> bool {
        if self
            .last_rendered
            .as_ref()
            .is_some_and(|fp| fp.matches(text, mode))
        {
            return true;
        }
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.generation == self.latest && f.fingerprint.matches(text, mode))
    }

    pub(crate) fn issue(&mut self, text: &str, mode: Mode) -> Generation {
        self.latest = self.latest.next();
        self.in_flight = Some(InFlight {
            generation: self.latest,
            fingerprint: Fingerprint::new(text, mode),
        });
        self.latest
    }

    pub(crate) fn new_timer(&mut self) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.pending_timer = Some(id);
        id
    }
}
