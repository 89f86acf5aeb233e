//! Bilateral Blur Tests
//!
//! Tests for:
//! - Weight shape (peak, spatial falloff, depth cutoff)
//! - Edge preservation across depth discontinuities
//! - Image borders and empty neighborhoods
//! - Blur extent derived from the filter radius

use myth_dao::compute::{bilateral_weight, blur};
use myth_dao::resources::sample_set::Axis;
use myth_dao::resources::texture::{DepthTexture, ObscuranceTexture};
use myth_dao::EffectParameters;

const EPSILON: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Weights
// ============================================================================

#[test]
fn weight_peaks_at_center_with_equal_depth() {
    let peak = bilateral_weight(0, 0.0, 1.0, 0.5, 1e-4);
    assert!(approx(peak, 1.0));
    for offset in -3..=3 {
        for delta in [-0.4, -0.1, 0.0, 0.1, 0.4] {
            assert!(bilateral_weight(offset, delta, 1.0, 0.5, 1e-4) <= peak);
        }
    }
}

#[test]
fn weight_falls_off_with_distance_and_depth() {
    let w = |offset, delta| bilateral_weight(offset, delta, 1.0, 0.5, 1e-4);
    assert!(w(1, 0.0) < w(0, 0.0));
    assert!(w(2, 0.0) < w(1, 0.0));
    assert!(w(0, 0.3) < w(0, 0.1));
    assert!(approx(w(1, 0.0), w(-1, 0.0)));
}

#[test]
fn weight_is_zero_beyond_cutoff() {
    assert_eq!(bilateral_weight(1, 0.6, 1.0, 0.5, 1e-4), 0.0);
    assert_eq!(bilateral_weight(0, f32::INFINITY, 1.0, 0.5, 1e-4), 0.0);
    assert!(bilateral_weight(0, 0.5, 1.0, 0.5, 1e-4) >= 0.0);
}

// ============================================================================
// Blur passes
// ============================================================================

#[test]
fn depth_edges_are_preserved() {
    let depth = DepthTexture::from_fn(24, 8, |x, _| if x < 12 { 2.0 } else { 8.0 });
    let input = ObscuranceTexture::from_fn(24, 8, |x, _| if x < 12 { 1.0 } else { 0.0 });
    let params = EffectParameters::default();

    let out = blur(&input, &depth, Axis::X, &params);
    for y in 0..8 {
        assert!(approx(out.get(11, y), 1.0));
        assert!(approx(out.get(12, y), 0.0));
    }
}

#[test]
fn pass_filters_only_along_its_axis() {
    let depth = DepthTexture::new(16, 16, 3.0);
    let mut input = ObscuranceTexture::new(16, 16, 0.0);
    input.set(8, 8, 1.0);
    let params = EffectParameters::default();

    let out = blur(&input, &depth, Axis::X, &params);
    assert!(out.get(9, 8) > 0.0);
    assert_eq!(out.get(8, 9), 0.0);

    let out = blur(&input, &depth, Axis::Y, &params);
    assert!(out.get(8, 9) > 0.0);
    assert_eq!(out.get(9, 8), 0.0);
}

#[test]
fn blur_extent_follows_filter_radius() {
    let depth = DepthTexture::new(32, 4, 3.0);
    let mut input = ObscuranceTexture::new(32, 4, 0.0);
    input.set(16, 1, 1.0);

    let mut params = EffectParameters::default();
    params.set_bilateral_filter_radius(0.5);
    assert_eq!(params.blur_half_width(), 2);
    let narrow = blur(&input, &depth, Axis::X, &params);
    assert!(narrow.get(18, 1) > 0.0);
    assert_eq!(narrow.get(19, 1), 0.0);

    params.set_bilateral_filter_radius(2.0);
    assert_eq!(params.blur_half_width(), 8);
    let wide = blur(&input, &depth, Axis::X, &params);
    assert!(wide.get(24, 1) > 0.0);
    assert_eq!(wide.get(25, 1), 0.0);
}

#[test]
fn border_pixels_skip_outside_taps() {
    let depth = DepthTexture::new(10, 2, 3.0);
    let input = ObscuranceTexture::from_fn(10, 2, |x, _| if x == 0 { 0.8 } else { 0.2 });
    let params = EffectParameters::default();

    let out = blur(&input, &depth, Axis::X, &params);
    // Only in-image taps weigh in, so the border stays between the two levels.
    assert!(out.get(0, 0) < 0.8 && out.get(0, 0) > 0.2);
}

#[test]
fn pixel_without_weight_keeps_its_value() {
    let depth = DepthTexture::from_fn(8, 2, |x, _| if x == 4 { f32::INFINITY } else { 3.0 });
    let input = ObscuranceTexture::from_fn(8, 2, |x, _| if x == 4 { 0.7 } else { 0.1 });
    let params = EffectParameters::default();

    let out = blur(&input, &depth, Axis::X, &params);
    assert!(approx(out.get(4, 0), 0.7));
    assert!(approx(out.get(3, 0), 0.1));
}

#[test]
fn output_stays_in_unit_range() {
    let depth = DepthTexture::from_fn(20, 20, |x, y| 1.0 + ((x * 7 + y * 3) % 5) as f32 * 0.1);
    let input = ObscuranceTexture::from_fn(20, 20, |x, y| ((x * 13 + y * 29) % 11) as f32 / 10.0);
    let mut params = EffectParameters::default();
    params.set_filter_cutoff_radius(4.0);

    let out = blur(&blur(&input, &depth, Axis::X, &params), &depth, Axis::Y, &params);
    let (lo, hi) = out.min_max();
    assert!(lo >= 0.0 && hi <= 1.0);
}
