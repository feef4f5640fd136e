// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn drag_reports_nothing_until_active() {
    let mut drag = DragState::default();
    assert_eq!(drag.advance(Vec2::new(10.0, 10.0)), None);
}

#[test]
fn drag_reports_deltas_between_moves() {
    let mut drag = DragState {
        active: true,
        last: Vec2::new(100.0, 50.0),
    };
    assert_eq!(drag.advance(Vec2::new(110.0, 45.0)), Some(Vec2::new(10.0, -5.0)));
    assert_eq!(drag.advance(Vec2::new(110.0, 45.0)), Some(Vec2::ZERO));
    assert_eq!(drag.last, Vec2::new(110.0, 45.0));
}
