use crate::input::{action_for_key, KeyAction};
use crate::overlay;
use app_core::OrbitCamera;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Suspend or resume the audio context; the frame loop skips the mapper while paused.
pub fn set_paused(audio_ctx: &web::AudioContext, paused: &Cell<bool>, value: bool) {
    paused.set(value);
    if value {
        _ = audio_ctx.suspend();
    } else {
        _ = audio_ctx.resume();
    }
    log::info!("[keys] paused={}", value);
}

pub fn wire_global_keydown(
    audio_ctx: web::AudioContext,
    paused: Rc<Cell<bool>>,
    orbit: Rc<RefCell<OrbitCamera>>,
) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let Some(action) = action_for_key(&ev.key()) else {
            return;
        };
        ev.prevent_default();
        match action {
            KeyAction::ToggleHint => {
                if let Some(document) = crate::dom::window_document() {
                    overlay::toggle_hint(&document);
                }
            }
            KeyAction::TogglePause => set_paused(&audio_ctx, &paused, !paused.get()),
            KeyAction::ResetCamera => orbit.borrow_mut().reset(),
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
