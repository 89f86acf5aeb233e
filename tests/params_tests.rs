//! Effect Parameter Tests
//!
//! Tests for:
//! - Defaults and range clamping of every setter
//! - Version tracking (bumps only on effective change)
//! - Derived blur extent and output sink selection

use myth_dao::resources::dao::*;
use myth_dao::OutputSink;

const EPSILON: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Defaults & clamping
// ============================================================================

#[test]
fn defaults() {
    let params = EffectParameters::default();
    assert!(approx(params.worldspace_radius(), 0.5));
    assert!(approx(params.baseline_depth_bias(), 0.001));
    assert!(approx(params.intensity_modifier(), 1.0));
    assert!(params.range_cutoff());
    assert!(approx(params.bilateral_filter_radius(), 0.5));
    assert!(approx(params.filter_cutoff_radius(), 0.5));
    assert!(approx(params.bilateral_epsilon(), 1e-4));
    assert!(!params.show_debug_only());
    assert_eq!(params.version(), 0);
}

#[test]
fn setters_clamp_to_their_ranges() {
    let mut params = EffectParameters::default();

    params.set_worldspace_radius(10.0);
    assert!(approx(params.worldspace_radius(), WORLDSPACE_RADIUS_RANGE.1));
    params.set_worldspace_radius(0.0);
    assert!(approx(params.worldspace_radius(), WORLDSPACE_RADIUS_RANGE.0));

    params.set_baseline_depth_bias(-1.0);
    assert!(approx(params.baseline_depth_bias(), 0.0));
    params.set_baseline_depth_bias(0.5);
    assert!(approx(params.baseline_depth_bias(), 0.1));

    params.set_intensity_modifier(3.0);
    assert!(approx(params.intensity_modifier(), 2.0));

    params.set_bilateral_filter_radius(0.1);
    assert!(approx(params.bilateral_filter_radius(), 0.5));

    params.set_filter_cutoff_radius(100.0);
    assert!(approx(params.filter_cutoff_radius(), 4.0));

    params.set_bilateral_epsilon(1.0);
    assert!(approx(params.bilateral_epsilon(), 1e-2));
}

#[test]
fn nan_falls_back_to_range_minimum() {
    let mut params = EffectParameters::default();
    params.set_intensity_modifier(f32::NAN);
    assert!(approx(params.intensity_modifier(), INTENSITY_MODIFIER_RANGE.0));
}

// ============================================================================
// Versioning
// ============================================================================

#[test]
fn version_bumps_on_change_only() {
    let mut params = EffectParameters::default();

    params.set_worldspace_radius(0.5);
    params.set_range_cutoff(true);
    assert_eq!(params.version(), 0);

    params.set_worldspace_radius(1.5);
    assert_eq!(params.version(), 1);

    params.set_range_cutoff(false);
    assert_eq!(params.version(), 2);

    // Clamps to the value already stored.
    params.set_intensity_modifier(1.0);
    params.set_worldspace_radius(1.5);
    assert_eq!(params.version(), 2);
}

// ============================================================================
// Derived values
// ============================================================================

#[test]
fn blur_extent_scales_with_filter_radius() {
    let mut params = EffectParameters::default();
    assert_eq!(params.blur_half_width(), 2);
    assert!(approx(params.blur_sigma(), 1.0));

    params.set_bilateral_filter_radius(1.3);
    assert_eq!(params.blur_half_width(), 6);
    assert!(approx(params.blur_sigma(), 3.0));
}

#[test]
fn output_sink_follows_debug_flag() {
    let mut params = EffectParameters::default();
    assert_eq!(params.output_sink(), OutputSink::Composite);

    params.set_show_debug_only(true);
    assert_eq!(params.output_sink(), OutputSink::DebugView);
    assert_eq!(params.output_sink().slot(), DEBUG_VIEW_SLOT);
    assert_ne!(DEBUG_VIEW_SLOT, FILTERED_OBSCURANCE_SLOT);
}
