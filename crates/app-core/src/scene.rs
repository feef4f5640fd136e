//! Deterministic scene layout: where the bars sit and where the stars are.

use crate::constants::{BAR_SIZE, BAR_SPACING, STAR_EXTENT};
use glam::Vec3;
use rand::prelude::*;

/// Per-instance data for one bar, uploaded as a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BarInstance {
    pub x: f32,
    /// Drawn height in world units.
    pub height: f32,
}

/// Per-instance data for one star.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub _pad: f32,
}

/// X centre of bar `index` out of `count`, spaced evenly and starting at
/// `-(count / 2) * spacing`.
#[inline]
pub fn bar_x(index: usize, count: usize) -> f32 {
    let start = count as f32 / 2.0 * BAR_SPACING * -1.0;
    start + BAR_SPACING * index as f32
}

/// World-space height of a bar for a mapper scale. Non-positive and
/// non-finite scales collapse the bar.
#[inline]
pub fn bar_height(scale: f32) -> f32 {
    if scale.is_finite() {
        BAR_SIZE * scale.max(0.0)
    } else {
        0.0
    }
}

pub fn bar_instances(scales: &[f32]) -> Vec<BarInstance> {
    let n = scales.len();
    scales
        .iter()
        .enumerate()
        .map(|(i, s)| BarInstance {
            x: bar_x(i, n),
            height: bar_height(*s),
        })
        .collect()
}

/// `count` points uniformly distributed in a cube of edge [`STAR_EXTENT`]
/// centred on the origin.
pub fn starfield<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * STAR_EXTENT,
                (rng.gen::<f32>() - 0.5) * STAR_EXTENT,
                (rng.gen::<f32>() - 0.5) * STAR_EXTENT,
            )
        })
        .collect()
}

pub fn seeded_starfield(count: usize, seed: u64) -> Vec<StarInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    starfield(count, &mut rng)
        .into_iter()
        .map(|p| StarInstance {
            position: p.to_array(),
            _pad: 0.0,
        })
        .collect()
}
