// Host-side tests for the perspective and orbit cameras.

use app_core::constants::{CAMERA_Z, ORBIT_PITCH_LIMIT, ORBIT_RADIUS_MAX, ORBIT_RADIUS_MIN};
use app_core::{OrbitCamera, PerspectiveCamera};
use glam::{Mat4, Vec3};

fn approx_mat(a: Mat4, b: Mat4) -> bool {
    a.abs_diff_eq(b, 1e-5)
}

#[test]
fn projection_is_refreshed_only_on_request() {
    let mut cam = PerspectiveCamera::new(75.0, 16.0 / 9.0);
    let before = cam.projection_matrix();

    cam.set_fov(40.0);
    assert_eq!(cam.fov_degrees(), 40.0);
    assert!(approx_mat(cam.projection_matrix(), before));

    cam.update_projection_matrix();
    let expected = Mat4::perspective_rh(40f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
    assert!(approx_mat(cam.projection_matrix(), expected));
}

#[test]
fn narrower_fov_zooms_in() {
    let wide = PerspectiveCamera::new(75.0, 1.0).projection_matrix();
    let narrow = PerspectiveCamera::new(20.0, 1.0).projection_matrix();
    assert!(narrow.y_axis.y > wide.y_axis.y);
}

#[test]
fn set_aspect_updates_projection() {
    let mut cam = PerspectiveCamera::new(60.0, 1.0);
    cam.set_aspect(2.0);
    assert_eq!(cam.aspect(), 2.0);
    let expected = Mat4::perspective_rh(60f32.to_radians(), 2.0, 0.1, 100.0);
    assert!(approx_mat(cam.projection_matrix(), expected));

    cam.set_aspect(0.0);
    assert!(cam.aspect() > 0.0);
    assert!(cam.projection_matrix().is_finite());
}

#[test]
fn orbit_default_looks_down_negative_z() {
    let orbit = OrbitCamera::default();
    assert!(orbit.eye().abs_diff_eq(Vec3::new(0.0, 0.0, CAMERA_Z), 1e-6));
    let p = orbit.view_matrix().transform_point3(Vec3::ZERO);
    assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -CAMERA_Z), 1e-5));
}

#[test]
fn orbit_rotation_keeps_radius_and_clamps_pitch() {
    let mut orbit = OrbitCamera::default();
    orbit.rotate(std::f32::consts::FRAC_PI_2, 0.0);
    assert!(orbit.eye().abs_diff_eq(Vec3::new(CAMERA_Z, 0.0, 0.0), 1e-5));

    orbit.rotate(0.0, 10.0);
    assert_eq!(orbit.pitch, ORBIT_PITCH_LIMIT);
    orbit.rotate(0.0, -10.0);
    assert_eq!(orbit.pitch, -ORBIT_PITCH_LIMIT);
    assert!((orbit.eye().length() - CAMERA_Z).abs() < 1e-4);

    orbit.rotate(-std::f32::consts::PI, 0.0);
    assert!(orbit.yaw >= 0.0 && orbit.yaw < std::f32::consts::TAU);
}

#[test]
fn orbit_zoom_is_clamped_and_ignores_bad_factors() {
    let mut orbit = OrbitCamera::default();
    orbit.zoom(0.5);
    assert!((orbit.radius - CAMERA_Z * 0.5).abs() < 1e-6);
    orbit.zoom(0.001);
    assert_eq!(orbit.radius, ORBIT_RADIUS_MIN);
    orbit.zoom(1e6);
    assert_eq!(orbit.radius, ORBIT_RADIUS_MAX);
    orbit.zoom(f32::NAN);
    orbit.zoom(0.0);
    orbit.zoom(-2.0);
    assert_eq!(orbit.radius, ORBIT_RADIUS_MAX);
}

#[test]
fn orbit_reset_restores_default() {
    let mut orbit = OrbitCamera::default();
    orbit.rotate(1.0, 0.5);
    orbit.zoom(2.0);
    orbit.reset();
    assert_eq!(orbit.radius, CAMERA_Z);
    assert_eq!(orbit.yaw, 0.0);
    assert_eq!(orbit.pitch, 0.0);
}

#[test]
fn wrap_radians_stays_in_one_turn() {
    use app_core::wrap_radians;
    use std::f32::consts::TAU;
    assert_eq!(wrap_radians(0.0), 0.0);
    assert!((wrap_radians(TAU + 1.0) - 1.0).abs() < 1e-5);
    assert!((wrap_radians(-1.0) - (TAU - 1.0)).abs() < 1e-5);
    for angle in [-1e-9_f32, -f32::EPSILON, 17_000.0, -17_000.0, TAU] {
        let w = wrap_radians(angle);
        assert!((0.0..TAU).contains(&w), "{angle} -> {w}");
    }
}
