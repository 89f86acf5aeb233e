//! Directional horizon-based obscurance.
//!
//! For every slice and each of the two axes, a half-resolution texel marches
//! eight jittered distances along the slice's rotated axis direction and
//! accumulates how far each sample rises above the tangent plane:
//!
//! ```text
//! contribution = max(0, dot(v, n) / |v| - bias * (1 + d_q)),  v = Q - P
//! value        = clamp(intensity * Σ contribution / 8, 0, 1)
//! ```
//!
//! With `range_cutoff` enabled, samples farther than `worldspace_radius` from
//! `P` contribute exactly zero.

use glam::{Vec2, Vec3};

use crate::camera::CameraParams;
use crate::resources::dao::EffectParameters;
use crate::resources::sample_set::{Axis, SAMPLES_PER_AXIS, SLICE_COUNT, SampleSet};
use crate::resources::texture::{DepthNormalTexel, Texture2D};

use super::{DepthNormalSliceVolume, RawObscuranceVolume, dispatch_2d, slice_to_full};

/// Smallest projected sampling radius, in half-res pixels.
pub const MIN_PROJECTED_RADIUS: f32 = 1.0;

/// Largest projected sampling radius, in half-res pixels.
pub const MAX_PROJECTED_RADIUS: f32 = 64.0;

/// Normals shorter than this (squared) are treated as missing.
pub const MIN_NORMAL_LENGTH_SQUARED: f32 = 1e-8;

/// Sampling radius projected at `depth`, in half-res pixels.
#[must_use]
pub fn projected_radius(camera: &CameraParams, params: &EffectParameters, depth: f32) -> f32 {
    (params.worldspace_radius() * camera.pixels_per_unit(depth) * 0.5)
        .clamp(MIN_PROJECTED_RADIUS, MAX_PROJECTED_RADIUS)
}

/// Occlusion added by one sample at `q` (view depth `q_depth`) to the surface
/// point `p` with unit normal `n`.
#[must_use]
pub fn sample_contribution(
    p: Vec3,
    n: Vec3,
    q: Vec3,
    q_depth: f32,
    params: &EffectParameters,
) -> f32 {
    let v = q - p;
    let dist = v.length();
    if dist <= f32::EPSILON {
        return 0.0;
    }
    if params.range_cutoff() && dist > params.worldspace_radius() {
        return 0.0;
    }
    let bias = params.baseline_depth_bias() * (1.0 + q_depth);
    (v.dot(n) / dist - bias).max(0.0)
}

#[inline]
fn slice_uv(camera: &CameraParams, slice: usize, x: u32, y: u32) -> Vec2 {
    let (fx, fy) = slice_to_full(slice, x, y);
    Vec2::new(
        (fx as f32 + 0.5) / camera.width as f32,
        (fy as f32 + 0.5) / camera.height as f32,
    )
}

/// Evaluates one half-res texel of one slice along one axis.
#[must_use]
pub fn evaluate_texel(
    layer: &Texture2D<DepthNormalTexel>,
    slice: usize,
    axis: Axis,
    x: u32,
    y: u32,
    camera: &CameraParams,
    samples: &SampleSet,
    params: &EffectParameters,
) -> f32 {
    let texel = layer.get(x, y);
    let depth = texel.w;
    let normal = texel.truncate();
    if !camera.is_geometry(depth) || normal.length_squared() < MIN_NORMAL_LENGTH_SQUARED {
        return 0.0;
    }
    let n = normal.normalize();
    let p = camera.view_position(slice_uv(camera, slice, x, y), depth);

    let radius = projected_radius(camera, params, depth);
    let direction = samples.rotations[slice].rotate(axis.direction());
    let origin = Vec2::new(x as f32, y as f32);
    let max_x = layer.width() as i32 - 1;
    let max_y = layer.height() as i32 - 1;

    let mut sum = 0.0;
    for t in samples.axis_distances(slice, axis) {
        // floor(x + 0.5) so ties round the same way as the kernel.
        let tap = (origin + direction * (t * radius) + Vec2::splat(0.5)).floor();
        let qx = (tap.x as i32).clamp(0, max_x) as u32;
        let qy = (tap.y as i32).clamp(0, max_y) as u32;
        if qx == x && qy == y {
            continue;
        }
        let q_depth = layer.get(qx, qy).w;
        if !camera.is_geometry(q_depth) {
            continue;
        }
        let q = camera.view_position(slice_uv(camera, slice, qx, qy), q_depth);
        sum += sample_contribution(p, n, q, q_depth, params);
    }

    (params.intensity_modifier() * sum / SAMPLES_PER_AXIS as f32).clamp(0.0, 1.0)
}

/// Runs the evaluator for every slice and both axes.
///
/// Axes of one slice only share read-only inputs; each writes its own plane.
#[must_use]
pub fn evaluate(
    volume: &DepthNormalSliceVolume,
    camera: &CameraParams,
    samples: &SampleSet,
    params: &EffectParameters,
) -> RawObscuranceVolume {
    let mut raw = RawObscuranceVolume::new(volume.width(), volume.height());
    for slice in 0..SLICE_COUNT {
        let layer = volume.layer(slice);
        for axis in Axis::ALL {
            dispatch_2d(raw.plane_mut(slice, axis), |x, y| {
                evaluate_texel(layer, slice, axis, x, y, camera, samples, params)
            });
        }
    }
    raw
}
