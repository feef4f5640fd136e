//! Camera types shared with the web frontend.
//!
//! These types avoid referencing platform-specific APIs. The renderer uses
//! them to build view/projection matrices; the mapper only ever touches the
//! field of view, through the renderer.

use crate::constants::{
    CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR, ORBIT_PITCH_LIMIT, ORBIT_RADIUS_MAX, ORBIT_RADIUS_MIN,
};
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Wrap an angle into `[0, TAU)`. `rem_euclid` alone can round up to `TAU`
/// for tiny negative inputs.
#[inline]
pub fn wrap_radians(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Perspective projection with a cached matrix. The cache is only refreshed
/// through the setters, so a changed field of view takes effect exactly when
/// the owner asks for it.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    fov_degrees: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32) -> Self {
        let mut cam = Self {
            fov_degrees,
            aspect: aspect.max(1e-3),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            projection: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Store a new fov; call [`Self::update_projection_matrix`] to apply it.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(1e-3);
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

/// Orbit controls around a fixed target: yaw/pitch on a sphere of `radius`.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: CAMERA_Z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl OrbitCamera {
    /// Eye position. Yaw 0 and pitch 0 put the eye on +Z.
    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + self.radius * Vec3::new(sy * cp, sp, cy * cp)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = wrap_radians(self.yaw + d_yaw);
        self.pitch = (self.pitch + d_pitch).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// Multiplicative zoom; `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.radius = (self.radius * factor).clamp(ORBIT_RADIUS_MIN, ORBIT_RADIUS_MAX);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
