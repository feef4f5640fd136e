use glam::Vec3;

// Shared scene layout and look constants used by the web frontend.

// Bars
pub const BAR_SIZE: f32 = 0.035; // edge length of an unscaled bar cube
pub const BAR_SPACING: f32 = 0.10; // distance between neighbouring bar centres
pub const BAR_COLOR: [f32; 3] = [0.420, 0.012, 0.988]; // #6b03fc

// Starfield
pub const STAR_COUNT: usize = 5000;
pub const STAR_EXTENT: f32 = 10.0; // cube edge, centred on the origin
pub const STAR_SIZE: f32 = 0.005; // world-space point size
pub const STAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Camera
pub const CAMERA_Z: f32 = 3.5;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const ORBIT_RADIUS_MIN: f32 = 1.0;
pub const ORBIT_RADIUS_MAX: f32 = 20.0;
pub const ORBIT_PITCH_LIMIT: f32 = 1.55; // radians, just short of the poles
pub const ORBIT_DRAG_RADIANS_PER_PX: f32 = 0.005;
pub const ORBIT_WHEEL_ZOOM_PER_UNIT: f32 = 0.001;

// Lights
pub const FIXED_LIGHT_POS: [f32; 3] = [0.0, 0.0, 3.0];
pub const LIGHT_INTENSITY: f32 = 1.0;

// Post-processing
pub const BLOOM_THRESHOLD: f32 = 0.0;
pub const BLOOM_RADIUS: f32 = 0.3;
pub const TONE_EXPOSURE: f32 = 1.0;

// Audio
pub const TRACK_VOLUME: f32 = 0.6;

#[inline]
pub fn fixed_light_vec3() -> Vec3 {
    Vec3::new(FIXED_LIGHT_POS[0], FIXED_LIGHT_POS[1], FIXED_LIGHT_POS[2])
}
