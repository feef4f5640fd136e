use crate::input;
use app_core::constants::{ORBIT_DRAG_RADIANS_PER_PX, ORBIT_WHEEL_ZOOM_PER_UNIT};
use app_core::OrbitCamera;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub orbit: Rc<RefCell<OrbitCamera>>,
    pub drag_state: Rc<RefCell<input::DragState>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_css_px(&ev, &w.canvas);
        {
            let mut ds = w.drag_state.borrow_mut();
            ds.active = true;
            ds.last = pos;
        }
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_css_px(&ev, &w.canvas);
        let delta = w.drag_state.borrow_mut().advance(pos);
        if let Some(d) = delta {
            // Dragging right spins the scene right, i.e. the eye moves left.
            w.orbit.borrow_mut().rotate(
                -d.x * ORBIT_DRAG_RADIANS_PER_PX,
                d.y * ORBIT_DRAG_RADIANS_PER_PX,
            );
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.drag_state.borrow_mut().active = false;
        _ = w.canvas.release_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    for name in ["pointerup", "pointercancel"] {
        _ = canvas_for_listener
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        let factor = (input::wheel_delta_px(&ev) * ORBIT_WHEEL_ZOOM_PER_UNIT).exp();
        w.orbit.borrow_mut().zoom(factor);
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
