//! Directional Evaluation Tests
//!
//! Tests for:
//! - Per-sample contribution (tangent plane, range cutoff, depth-scaled bias)
//! - Projected radius clamping
//! - Background and missing-normal texels
//! - Output range of the raw volume

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use myth_dao::compute::evaluate::{
    MAX_PROJECTED_RADIUS, MIN_PROJECTED_RADIUS, evaluate_texel, projected_radius,
};
use myth_dao::compute::{deinterleave, evaluate, sample_contribution};
use myth_dao::resources::sample_set::Axis;
use myth_dao::resources::texture::{DepthTexture, NormalTexture, Texture2D};
use myth_dao::{CameraParams, EffectParameters, GBufferLayout, SampleSetGenerator};

fn camera(width: u32, height: u32) -> CameraParams {
    CameraParams::perspective(60f32.to_radians(), width, height, 0.1, 100.0)
}

fn raw_values(depth: &DepthTexture, normals: &NormalTexture, params: &EffectParameters) -> Vec<f32> {
    let cam = camera(depth.width(), depth.height());
    let samples = SampleSetGenerator::default().generate(0);
    let volume = deinterleave(depth, normals, &cam, &GBufferLayout::default()).unwrap();
    let raw = evaluate(&volume, &cam, &samples, params);

    let mut values = Vec::new();
    for slice in 0..4 {
        for axis in Axis::ALL {
            values.extend_from_slice(raw.plane(slice, axis).texels());
        }
    }
    values
}

// ============================================================================
// Sample contribution
// ============================================================================

#[test]
fn sample_above_tangent_plane_occludes() {
    let params = EffectParameters::default();
    let p = Vec3::new(0.0, 0.0, -4.0);
    let q = Vec3::new(0.2, 0.0, -3.8);
    assert!(sample_contribution(p, Vec3::Z, q, 3.8, &params) > 0.5);
}

#[test]
fn sample_below_tangent_plane_does_not_occlude() {
    let params = EffectParameters::default();
    let p = Vec3::new(0.0, 0.0, -4.0);
    let q = Vec3::new(0.2, 0.0, -4.2);
    assert_eq!(sample_contribution(p, Vec3::Z, q, 4.2, &params), 0.0);
}

#[test]
fn range_cutoff_rejects_distant_samples_exactly() {
    let mut params = EffectParameters::default();
    params.set_worldspace_radius(1.0);
    let p = Vec3::new(0.0, 0.0, -10.0);
    let q = Vec3::new(0.1, 0.0, -3.0);

    assert_eq!(sample_contribution(p, Vec3::Z, q, 3.0, &params), 0.0);

    params.set_range_cutoff(false);
    assert!(sample_contribution(p, Vec3::Z, q, 3.0, &params) > 0.9);
}

#[test]
fn bias_grows_with_sample_depth() {
    let mut params = EffectParameters::default();
    params.set_baseline_depth_bias(0.05);
    params.set_worldspace_radius(2.0);
    let n = Vec3::Z;
    let v = Vec3::new(0.5, 0.0, 0.3);

    let near = sample_contribution(Vec3::new(0.0, 0.0, -1.0), n, Vec3::new(0.0, 0.0, -1.0) + v, 0.7, &params);
    let far = sample_contribution(Vec3::new(0.0, 0.0, -8.0), n, Vec3::new(0.0, 0.0, -8.0) + v, 7.7, &params);
    assert!(far < near, "far {far} should be below near {near}");
}

// ============================================================================
// Projected radius
// ============================================================================

#[test]
fn projected_radius_shrinks_with_depth() {
    let cam = camera(256, 256);
    let params = EffectParameters::default();
    let near = projected_radius(&cam, &params, 2.0);
    let far = projected_radius(&cam, &params, 20.0);
    assert!(far < near);
    assert!((MIN_PROJECTED_RADIUS..=MAX_PROJECTED_RADIUS).contains(&near));
    assert!((MIN_PROJECTED_RADIUS..=MAX_PROJECTED_RADIUS).contains(&far));
}

// ============================================================================
// Texel evaluation
// ============================================================================

#[test]
fn background_texel_is_unoccluded() {
    let cam = camera(8, 8);
    let samples = SampleSetGenerator::default().generate(0);
    let params = EffectParameters::default();
    let mut layer = Texture2D::new(4, 4, Vec4::new(0.0, 0.0, 1.0, 2.0));
    layer.set(1, 1, Vec4::new(0.0, 0.0, 1.0, cam.far));

    for axis in Axis::ALL {
        assert_eq!(evaluate_texel(&layer, 0, axis, 1, 1, &cam, &samples, &params), 0.0);
    }
}

#[test]
fn far_plane_everywhere_gives_zero() {
    let depth = DepthTexture::new(32, 24, 100.0);
    let normals = NormalTexture::new(32, 24, Vec3::Z);
    let values = raw_values(&depth, &normals, &EffectParameters::default());
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn zero_normals_give_zero() {
    let depth = DepthTexture::from_fn(32, 24, |x, _| 2.0 + (x % 3) as f32);
    let normals = NormalTexture::new(32, 24, Vec3::ZERO);
    let values = raw_values(&depth, &normals, &EffectParameters::default());
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn flat_wall_facing_the_camera_is_unoccluded() {
    let depth = DepthTexture::new(48, 32, 5.0);
    let normals = NormalTexture::new(48, 32, Vec3::Z);
    let values = raw_values(&depth, &normals, &EffectParameters::default());
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn raw_values_stay_in_unit_range() {
    let mut rng = StdRng::seed_from_u64(9);
    let depth = DepthTexture::from_fn(40, 30, |_, _| rng.random_range(0.5..20.0));
    let normals = NormalTexture::from_fn(40, 30, |_, _| {
        Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(0.1..1.0),
        )
    });
    let mut params = EffectParameters::default();
    params.set_intensity_modifier(2.0);
    params.set_range_cutoff(false);

    let values = raw_values(&depth, &normals, &params);
    assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(values.iter().any(|&v| v > 0.0));
}
