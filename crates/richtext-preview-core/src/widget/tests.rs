use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use super::*;
use crate::transport::PreviewTransport;

const DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Empty,
    Markup(String),
    Notice(Notice),
}

/// Drives a widget the way the browser layer does, with a virtual clock and
/// requests that resolve only when the test says so.
struct Harness {
    widget: PreviewWidget,
    text: String,
    now: Duration,
    timer: Option<(TimerId, Duration)>,
    issued: Vec<RenderTicket>,
    visible: bool,
    loading: bool,
    body: Body,
}

impl Harness {
    fn new(mode: Mode, text: &str) -> Self {
        Self {
            widget: PreviewWidget::new(mode, DEBOUNCE),
            text: text.to_owned(),
            now: Duration::ZERO,
            timer: None,
            issued: Vec::new(),
            visible: false,
            loading: false,
            body: Body::Empty,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowPanel => self.visible = true,
                Effect::HidePanel => self.visible = false,
                Effect::ScheduleRefresh { timer, delay } => {
                    assert!(self.timer.is_none(), "previous timer was not cancelled");
                    self.timer = Some((timer, self.now + delay));
                }
                Effect::CancelRefresh(timer) => {
                    let (pending, _) = self.timer.take().expect("no timer to cancel");
                    assert_eq!(pending, timer);
                }
                Effect::SetLoading(loading) => self.loading = loading,
                Effect::ClearBody => self.body = Body::Empty,
                Effect::Issue(ticket) => self.issued.push(ticket),
                Effect::ShowMarkup(html) => self.body = Body::Markup(html),
                Effect::ShowNotice(notice) => self.body = Body::Notice(notice),
            }
        }
    }

    fn toggle(&mut self) {
        let effects = self.widget.toggle_panel(&self.text);
        self.apply(effects);
    }

    fn edit(&mut self, text: &str) {
        self.text = text.to_owned();
        let effects = self.widget.on_content_changed();
        self.apply(effects);
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        if let Some((timer, deadline)) = self.timer {
            if deadline <= self.now {
                self.timer = None;
                let effects = self.widget.on_timer_fired(timer, &self.text);
                self.apply(effects);
            }
        }
    }

    fn resolve(&mut self, index: usize, result: Result<RenderOutcome, TransportError>) {
        let ticket = self.issued[index].clone();
        let effects = self.widget.on_response(ticket, result);
        self.apply(effects);
    }

    fn render_ok(&mut self, index: usize, html: &str) {
        self.resolve(index, Ok(RenderOutcome::Rendered(html.to_owned())));
    }
}

#[test]
fn test_open_renders_and_caches() {
    let mut h = Harness::new(Mode::Block, "**hola**");
    h.toggle();
    assert!(h.visible);
    assert!(h.loading);
    assert_eq!(h.issued.len(), 1);
    assert_eq!(h.issued[0].request, RenderRequest::new("**hola**", Mode::Block));

    h.render_ok(0, "<strong>hola</strong>");
    assert!(!h.loading);
    assert_eq!(h.body, Body::Markup("<strong>hola</strong>".into()));
    assert_eq!(
        h.widget.session().last_rendered(),
        Some(&Fingerprint::new("**hola**", Mode::Block))
    );
}

#[test]
fn test_reopen_without_edit_is_free() {
    let mut h = Harness::new(Mode::Inline, "*x*");
    h.toggle();
    h.render_ok(0, "<em>x</em>");

    for _ in 0..3 {
        h.toggle();
        assert!(!h.visible);
        h.toggle();
        assert!(h.visible);
    }
    assert_eq!(h.issued.len(), 1);
    assert_eq!(h.body, Body::Markup("<em>x</em>".into()));
}

#[test]
fn test_edit_while_closed_costs_nothing_until_open() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.render_ok(0, "<p>a</p>");
    h.toggle();

    h.edit("ab");
    h.edit("abc");
    h.advance(1_000);
    assert_eq!(h.issued.len(), 1);
    assert!(h.timer.is_none());
    assert!(h.widget.session().last_rendered().is_none());

    h.toggle();
    assert_eq!(h.issued.len(), 2);
    assert_eq!(h.issued[1].request.text, "abc");
}

#[test]
fn test_reopen_after_edit_hides_old_markup() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.render_ok(0, "<p>a</p>");
    h.toggle();

    h.edit("ab");
    h.toggle();
    assert!(h.visible);
    assert!(h.loading);
    assert_eq!(h.issued.len(), 2);
    assert_eq!(h.body, Body::Empty);

    h.resolve(1, Err(TransportError::Network("offline".into())));
    h.toggle();
    assert_eq!(
        h.body,
        Body::Notice(Notice::Error("network error: offline".into()))
    );
    h.toggle();
    assert_eq!(h.issued.len(), 3, "failed render is retried on reopen");
    assert_eq!(h.body, Body::Empty);
}

#[test]
fn test_edit_while_open_is_debounced() {
    let mut h = Harness::new(Mode::Block, "");
    h.toggle();
    h.render_ok(0, "");

    for (i, text) in ["h", "ho", "hol", "hola"].iter().enumerate() {
        h.edit(text);
        if i < 3 {
            h.advance(100);
        }
    }
    assert_eq!(h.issued.len(), 1, "no request before the quiet period");

    h.advance(249);
    assert_eq!(h.issued.len(), 1);
    h.advance(1);
    assert_eq!(h.issued.len(), 2);
    assert_eq!(h.issued[1].request.text, "hola");

    h.advance(1_000);
    assert_eq!(h.issued.len(), 2);
}

#[test]
fn test_superseded_response_is_discarded() {
    let mut h = Harness::new(Mode::Block, "A");
    h.toggle();
    h.edit("B");
    h.advance(250);
    assert_eq!(h.issued.len(), 2);

    // B answers first, then the slow A arrives
    h.render_ok(1, "<p>B</p>");
    h.render_ok(0, "<p>A</p>");
    assert_eq!(h.body, Body::Markup("<p>B</p>".into()));
    assert_eq!(
        h.widget.session().last_rendered(),
        Some(&Fingerprint::new("B", Mode::Block))
    );
    assert!(!h.loading);
}

#[test]
fn test_stale_response_does_not_clear_loading() {
    let mut h = Harness::new(Mode::Block, "A");
    h.toggle();
    h.edit("B");
    h.advance(250);

    h.render_ok(0, "<p>A</p>");
    assert!(h.loading, "B is still outstanding");
    assert_eq!(h.body, Body::Empty);
}

#[test]
fn test_failure_is_shown_inline_and_retried() {
    let mut h = Harness::new(Mode::Block, "x");
    h.toggle();
    h.resolve(0, Err(TransportError::status(500, "")));
    assert!(!h.loading);
    assert_eq!(
        h.body,
        Body::Notice(Notice::Error("Preview request failed (500)".into()))
    );
    assert!(h.widget.session().last_rendered().is_none());

    h.toggle();
    h.toggle();
    assert_eq!(h.issued.len(), 2, "reopening retries a failed render");
}

#[test]
fn test_failure_message_text() {
    let notice = Notice::Error(TransportError::Network("offline".into()).to_string());
    insta::assert_snapshot!(notice.message(), @"Preview error: network error: offline");
    assert_eq!(notice.class(), "rt-error");
}

#[test]
fn test_close_cancels_pending_refresh() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.render_ok(0, "a");
    h.edit("ab");
    assert!(h.timer.is_some());

    h.toggle();
    assert!(h.timer.is_none());
    h.advance(1_000);
    assert_eq!(h.issued.len(), 1);
}

#[test]
fn test_late_timer_is_ignored() {
    let mut widget = PreviewWidget::new(Mode::Block, DEBOUNCE);
    widget.toggle_panel("");
    let first = match widget.on_content_changed().as_slice() {
        [Effect::ScheduleRefresh { timer, .. }] => *timer,
        other => panic!("unexpected effects {other:?}"),
    };
    let effects = widget.on_content_changed();
    assert_eq!(effects[0], Effect::CancelRefresh(first));

    assert!(widget.on_timer_fired(first, "late").is_empty());
}

#[test]
fn test_response_while_closed_stays_hidden() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.toggle();
    h.render_ok(0, "<p>a</p>");
    assert!(!h.visible);
    assert_eq!(h.body, Body::Markup("<p>a</p>".into()));

    h.toggle();
    assert!(h.visible);
    assert_eq!(h.issued.len(), 1, "hidden result is reused");
}

#[test]
fn test_failure_while_closed_is_not_shown() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.toggle();
    h.resolve(0, Err(TransportError::Timeout(10_000)));
    assert_eq!(h.body, Body::Empty);
    assert!(!h.loading);
}

#[test]
fn test_reopen_while_fetching_does_not_duplicate() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.toggle();
    h.toggle();
    assert_eq!(h.issued.len(), 1);
    h.render_ok(0, "<p>a</p>");
    assert_eq!(h.body, Body::Markup("<p>a</p>".into()));
}

#[test]
fn test_disabled_is_terminal() {
    let mut h = Harness::new(Mode::Block, "a");
    h.toggle();
    h.resolve(0, Ok(RenderOutcome::Disabled));
    assert_eq!(h.body, Body::Notice(Notice::Disabled));
    assert!(h.widget.session().is_disabled());

    h.edit("ab");
    h.advance(1_000);
    h.toggle();
    h.toggle();
    assert_eq!(h.issued.len(), 1);
    assert_eq!(h.body, Body::Notice(Notice::Disabled));
}

#[test]
fn test_example_scenario() {
    let mut h = Harness::new(Mode::Block, "**hola**");
    h.toggle();
    h.render_ok(0, "<strong>hola</strong>");

    h.edit("**hola** mundo");
    assert!(h.widget.session().last_rendered().is_none());
    h.advance(250);
    assert_eq!(h.issued.len(), 2);
    assert_eq!(
        h.issued[1].request,
        RenderRequest::new("**hola** mundo", Mode::Block)
    );
    h.render_ok(1, "<strong>hola</strong> mundo");
    assert_eq!(h.body, Body::Markup("<strong>hola</strong> mundo".into()));
}

/// Answers every request immediately from a fixed table.
struct Echo;

impl PreviewTransport for Echo {
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = Result<RenderOutcome, TransportError>> {
        let out = if request.text.is_empty() {
            Ok(RenderOutcome::Rendered(String::new()))
        } else {
            Ok(RenderOutcome::Rendered(format!(
                "<{0}>{1}</{0}>",
                request.mode, request.text
            )))
        };
        std::future::ready(out)
    }
}

fn poll_ready<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    match fut.as_mut().poll(&mut Context::from_waker(Waker::noop())) {
        Poll::Ready(out) => out,
        Poll::Pending => panic!("transport future was not ready"),
    }
}

#[test]
fn test_round_trip_through_transport() {
    let mut widget = PreviewWidget::new(Mode::Inline, DEBOUNCE);
    let effects = widget.toggle_panel("hi");
    let Some(Effect::Issue(ticket)) = effects.into_iter().find(|e| matches!(e, Effect::Issue(_)))
    else {
        panic!("no request issued");
    };

    let result = poll_ready(Echo.render(&ticket.request));
    let effects = widget.on_response(ticket, result);
    assert_eq!(
        effects,
        vec![
            Effect::SetLoading(false),
            Effect::ShowMarkup("<inline>hi</inline>".into())
        ]
    );
    assert!(poll_ready(Echo.render(&RenderRequest::new("", Mode::Block))).is_ok());
}
