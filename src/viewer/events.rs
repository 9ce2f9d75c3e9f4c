//! DOM event wiring for `CanvasGrid`.
//!
//! Listeners translate browser events into engine input, deliver the
//! queued host notifications once the shared state is released, and then
//! request a redraw if anything changed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::{CanvasGrid, Engine, SharedState};
use crate::interaction::{Modifiers, PointerInput};

/// An attached event listener, removed again on drop.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .ok();
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
    }
}

/// Mouse position relative to the canvas, in CSS pixels.
fn pointer_input(canvas: &HtmlCanvasElement, event: &MouseEvent) -> PointerInput {
    let rect = canvas.get_bounding_client_rect();
    PointerInput {
        x: f64::from(event.client_x()) - rect.left(),
        y: f64::from(event.client_y()) - rect.top(),
        button: event.button(),
        modifiers: modifiers(event),
    }
}

impl CanvasGrid {
    /// Run `f` against the engine, then deliver notifications and redraw.
    /// Returns `None` if the state is already borrowed (re-entrant event).
    pub(crate) fn with_engine<T>(
        state: &Rc<RefCell<SharedState>>,
        raw: &JsValue,
        f: impl FnOnce(&mut Engine) -> T,
    ) -> Option<T> {
        let (result, events, callbacks, redraw) = {
            let Ok(mut s) = state.try_borrow_mut() else {
                log::debug!("grid state busy, dropping event");
                return None;
            };
            let result = f(&mut s.engine);
            let events = s.engine.host_mut().take_events();
            (result, events, s.callbacks.clone(), s.engine.needs_redraw())
        };
        callbacks.deliver(events, raw);
        if redraw {
            Self::request_redraw(state);
        }
        Some(result)
    }

    pub(crate) fn wire_events(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<SharedState>>,
    ) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let target: &EventTarget = canvas.as_ref();
        // Keyboard events need a focusable canvas.
        canvas.set_tab_index(0);

        // Mouse down
        {
            let state = Rc::clone(state);
            let canvas = canvas.clone();
            listeners.push(Listener::attach(target, "mousedown", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                // Secondary buttons are left to the contextmenu handler.
                if mouse.button() != 0 {
                    return;
                }
                let _ = canvas.focus();
                let input = pointer_input(&canvas, mouse);
                Self::with_engine(&state, &event, |e| e.pointer_down(&input));
            }));
        }

        // Move and release go on the window so a drag survives leaving the
        // canvas.
        if let Some(window) = web_sys::window() {
            let window: &EventTarget = window.as_ref();
            {
                let state = Rc::clone(state);
                let canvas = canvas.clone();
                listeners.push(Listener::attach(window, "mousemove", move |event| {
                    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                        let input = pointer_input(&canvas, mouse);
                        Self::with_engine(&state, &event, |e| e.pointer_move(&input));
                    }
                }));
            }
            {
                let state = Rc::clone(state);
                let canvas = canvas.clone();
                listeners.push(Listener::attach(window, "mouseup", move |event| {
                    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                        let input = pointer_input(&canvas, mouse);
                        Self::with_engine(&state, &event, |e| e.pointer_up(&input));
                    }
                }));
            }
        }

        // Double click
        {
            let state = Rc::clone(state);
            let canvas = canvas.clone();
            listeners.push(Listener::attach(target, "dblclick", move |event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    let input = pointer_input(&canvas, mouse);
                    Self::with_engine(&state, &event, |e| e.double_click(&input));
                }
            }));
        }

        // Context menu
        {
            let state = Rc::clone(state);
            let canvas = canvas.clone();
            listeners.push(Listener::attach(target, "contextmenu", move |event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    let input = pointer_input(&canvas, mouse);
                    if Self::with_engine(&state, &event, |e| e.context_menu(&input)) == Some(true) {
                        event.prevent_default();
                    }
                }
            }));
        }

        // Wheel
        {
            let state = Rc::clone(state);
            listeners.push(Listener::attach(target, "wheel", move |event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let moved = Self::with_engine(&state, &event, |e| {
                    let (line, page) = (e.config().default_row_height, e.geometry().body_height());
                    let scale = match wheel.delta_mode() {
                        WheelEvent::DOM_DELTA_LINE => line,
                        WheelEvent::DOM_DELTA_PAGE => page,
                        _ => 1.0,
                    };
                    e.scroll_by(wheel.delta_x() * scale, wheel.delta_y() * scale)
                });
                if moved == Some(true) {
                    event.prevent_default();
                }
            }));
        }

        // Keyboard
        {
            let state = Rc::clone(state);
            listeners.push(Listener::attach(target, "keydown", move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let mods = Modifiers {
                    shift: key.shift_key(),
                    ctrl: key.ctrl_key(),
                    meta: key.meta_key(),
                    alt: key.alt_key(),
                };
                let name = key.key();
                if Self::with_engine(&state, &event, |e| e.key_down(&name, mods)) == Some(true) {
                    event.prevent_default();
                }
            }));
        }

        listeners
    }

    /// Follow the system color scheme for `ThemeMode::Auto`.
    pub(crate) fn watch_color_scheme(state: &Rc<RefCell<SharedState>>) -> Option<Listener> {
        let query = web_sys::window()?
            .match_media("(prefers-color-scheme: dark)")
            .ok()??;
        if let Ok(mut s) = state.try_borrow_mut() {
            s.engine.set_prefers_dark(query.matches());
        }
        let state = Rc::clone(state);
        let watched = query.clone();
        Some(Listener::attach(query.as_ref(), "change", move |event| {
            let dark = watched.matches();
            Self::with_engine(&state, &event, |e| e.set_prefers_dark(dark));
        }))
    }
}
