use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub active: bool,
    pub last: Vec2,
}

impl DragState {
    /// Pixel delta since the previous pointer position while dragging.
    pub fn advance(&mut self, pos: Vec2) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some(delta)
    }
}

#[inline]
pub fn pointer_css_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

/// Wheel delta normalised to pixels regardless of `deltaMode`.
#[inline]
pub fn wheel_delta_px(ev: &web::WheelEvent) -> f32 {
    let dy = ev.delta_y() as f32;
    match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => dy * 16.0,
        web::WheelEvent::DOM_DELTA_PAGE => dy * 400.0,
        _ => dy,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleHint,
    TogglePause,
    ResetCamera,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "h" | "H" => Some(KeyAction::ToggleHint),
        " " | "Spacebar" => Some(KeyAction::TogglePause),
        "r" | "R" => Some(KeyAction::ResetCamera),
        _ => None,
    }
}
