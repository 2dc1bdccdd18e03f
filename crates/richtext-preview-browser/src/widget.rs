//! Browser driver for a [`PreviewWidget`].
//!
//! Owns the DOM elements, the debounce timer and the listeners of one bound
//! field, and executes the effects the core widget returns. Everything runs
//! on the page's event loop; the only suspension point is the transport
//! future spawned for each issued request.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use richtext_preview_core::{
    BindSkip, Effect, FieldBinding, PreviewConfig, PreviewTransport, PreviewWidget, TimerId,
};
use web_sys::Document;

use crate::field::FieldControl;
use crate::panel::PanelDom;

struct WidgetState {
    binding: FieldBinding,
    field: FieldControl,
    panel: PanelDom,
    refresh: Option<(TimerId, Timeout)>,
}

struct Shared<T> {
    state: RefCell<WidgetState>,
    transport: T,
}

/// A bound field with its preview panel.
///
/// Dropping it removes the listeners; the registry keeps widgets for the
/// page's lifetime.
pub struct BrowserWidget<T> {
    shared: Rc<Shared<T>>,
    _listeners: [EventListener; 2],
}

impl<T: PreviewTransport + 'static> BrowserWidget<T> {
    /// Bind `field`, inserting the toggle and panel into its row.
    pub fn bind(
        document: &Document,
        field: FieldControl,
        config: &PreviewConfig,
        transport: T,
    ) -> Result<Self, BindSkip> {
        let Some(row) = field.row() else {
            tracing::trace!("field has no container, skipping");
            return Err(BindSkip::Ineligible);
        };

        let mode = field.mode();
        let (binding, panel) = FieldBinding::attach(&field, mode, config, || {
            PanelDom::build(document, &row, &config.panel_label, mode.guidance()).map_err(|e| {
                tracing::warn!("failed to build preview panel: {:?}", e);
                BindSkip::Ineligible
            })
        })?;

        let button = panel.button().clone();
        let input_target = field.element().clone();
        let shared = Rc::new(Shared {
            state: RefCell::new(WidgetState {
                binding,
                field,
                panel,
                refresh: None,
            }),
            transport,
        });

        let weak = Rc::downgrade(&shared);
        let on_click = EventListener::new(&button, "click", move |_| {
            if let Some(shared) = weak.upgrade() {
                dispatch(&shared, |widget, text| widget.toggle_panel(text));
            }
        });

        let weak = Rc::downgrade(&shared);
        let on_input = EventListener::new(&input_target, "input", move |_| {
            if let Some(shared) = weak.upgrade() {
                dispatch(&shared, |widget, _| widget.on_content_changed());
            }
        });

        tracing::debug!(%mode, "bound rich text preview");
        Ok(Self {
            shared,
            _listeners: [on_click, on_input],
        })
    }

    /// Same as clicking the toggle control.
    pub fn toggle(&self) {
        dispatch(&self.shared, |widget, text| widget.toggle_panel(text));
    }

    pub fn is_open(&self) -> bool {
        self.shared.state.borrow().panel.is_open()
    }

    /// Read-only view of the core widget.
    pub fn with_widget<R>(&self, f: impl FnOnce(&PreviewWidget) -> R) -> R {
        f(self.shared.state.borrow().binding.widget())
    }
}

/// Run a widget operation against the field's current text, then apply its
/// effects. The state borrow is released before any effect runs.
fn dispatch<T, F>(shared: &Rc<Shared<T>>, op: F)
where
    T: PreviewTransport + 'static,
    F: FnOnce(&mut PreviewWidget, &str) -> Vec<Effect>,
{
    let effects = {
        let mut state = shared.state.borrow_mut();
        let text = state.field.value();
        op(state.binding.widget_mut(), &text)
    };
    for effect in effects {
        apply(shared, effect);
    }
}

fn apply<T: PreviewTransport + 'static>(shared: &Rc<Shared<T>>, effect: Effect) {
    match effect {
        Effect::ShowPanel => shared.state.borrow().panel.set_open(true),
        Effect::HidePanel => shared.state.borrow().panel.set_open(false),
        Effect::SetLoading(loading) => shared.state.borrow().panel.set_loading(loading),
        Effect::ClearBody => shared.state.borrow().panel.clear_body(),
        Effect::ShowMarkup(html) => shared.state.borrow().panel.show_markup(&html),
        Effect::ShowNotice(notice) => shared.state.borrow().panel.show_notice(&notice),
        Effect::ScheduleRefresh { timer, delay } => {
            let weak: Weak<Shared<T>> = Rc::downgrade(shared);
            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            let handle = Timeout::new(millis, move || {
                if let Some(shared) = weak.upgrade() {
                    dispatch(&shared, |widget, text| widget.on_timer_fired(timer, text));
                }
            });
            // replacing a spent handle is harmless; a live one was cancelled first
            shared.state.borrow_mut().refresh = Some((timer, handle));
        }
        Effect::CancelRefresh(timer) => {
            let mut state = shared.state.borrow_mut();
            // dropping the handle clears the timeout
            if state.refresh.as_ref().is_some_and(|(id, _)| *id == timer) {
                state.refresh = None;
            }
        }
        Effect::Issue(ticket) => {
            let weak = Rc::downgrade(shared);
            wasm_bindgen_futures::spawn_local(async move {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let result = shared.transport.render(&ticket.request).await;
                dispatch(&shared, |widget, _| widget.on_response(ticket, result));
            });
        }
    }
}
