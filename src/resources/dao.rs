//! Deinterleaved Ambient Obscurance Configuration
//!
//! This module defines the effect parameters as pure data, following the same
//! pattern as the engine's other post-processing settings: user-facing setters
//! clamp into the supported range and bump a [`ChangeTracker`] so the GPU pass
//! re-uploads its uniforms only when something actually changed.
//!
//! # GPU Uniform Struct
//!
//! - [`DaoUniforms`]: camera reconstruction data, the sample set, and every
//!   effect parameter, shared by all compute kernels of the pass.
//!
//! # Parameters
//!
//! | Parameter                 | Range          | Default |
//! |---------------------------|----------------|---------|
//! | `worldspace_radius`       | 0.5 – 2.0      | 0.5     |
//! | `baseline_depth_bias`     | 0.0 – 0.1      | 0.001   |
//! | `intensity_modifier`      | 0.5 – 2.0      | 1.0     |
//! | `range_cutoff`            | bool           | true    |
//! | `bilateral_filter_radius` | 0.5 – 2.0      | 0.5     |
//! | `filter_cutoff_radius`    | 0.01 – 4.0     | 0.5     |
//! | `bilateral_epsilon`       | 1e-6 – 1e-2    | 1e-4    |
//! | `show_debug_only`         | bool           | false   |

use glam::{Mat4, Vec2, Vec4};

use crate::camera::CameraParams;
use crate::define_gpu_data_struct;
use crate::resources::gbuffer::GBufferLayout;
use crate::resources::sample_set::SampleSet;
use crate::resources::uniforms::UniformArray;
use crate::resources::version_tracker::ChangeTracker;

pub const WORLDSPACE_RADIUS_RANGE: (f32, f32) = (0.5, 2.0);
pub const BASELINE_DEPTH_BIAS_RANGE: (f32, f32) = (0.0, 0.1);
pub const INTENSITY_MODIFIER_RANGE: (f32, f32) = (0.5, 2.0);
pub const BILATERAL_FILTER_RADIUS_RANGE: (f32, f32) = (0.5, 2.0);
pub const FILTER_CUTOFF_RADIUS_RANGE: (f32, f32) = (0.01, 4.0);
pub const BILATERAL_EPSILON_RANGE: (f32, f32) = (1e-6, 1e-2);

/// Blur taps per side for each unit of `bilateral_filter_radius`.
pub const BLUR_TAPS_PER_UNIT: f32 = 4.0;

/// Slot under which the composited output is published.
pub const FILTERED_OBSCURANCE_SLOT: &str = "filtered_obscurance";

/// Slot under which the debug-only output is published.
pub const DEBUG_VIEW_SLOT: &str = "obscurance_debug_view";

// ============================================================================
// Output sink
// ============================================================================

/// Where the final filtered obscurance goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputSink {
    /// Blended into the diffuse lighting term by the host compositor.
    #[default]
    Composite,
    /// Displayed directly, bypassing the lighting blend.
    DebugView,
}

impl OutputSink {
    /// Well-known slot name the output is published under.
    #[must_use]
    pub const fn slot(self) -> &'static str {
        match self {
            Self::Composite => FILTERED_OBSCURANCE_SLOT,
            Self::DebugView => DEBUG_VIEW_SLOT,
        }
    }
}

// ============================================================================
// EffectParameters
// ============================================================================

/// Per-instance effect configuration (pure data + automatic version control).
///
/// # Usage
///
/// ```rust,ignore
/// let mut params = EffectParameters::default();
/// params.set_worldspace_radius(1.0);
/// params.set_range_cutoff(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParameters {
    worldspace_radius: f32,
    baseline_depth_bias: f32,
    intensity_modifier: f32,
    range_cutoff: bool,
    bilateral_filter_radius: f32,
    filter_cutoff_radius: f32,
    bilateral_epsilon: f32,
    show_debug_only: bool,
    tracker: ChangeTracker,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            worldspace_radius: 0.5,
            baseline_depth_bias: 0.001,
            intensity_modifier: 1.0,
            range_cutoff: true,
            bilateral_filter_radius: 0.5,
            filter_cutoff_radius: 0.5,
            bilateral_epsilon: 1e-4,
            show_debug_only: false,
            tracker: ChangeTracker::new(),
        }
    }
}

fn clamp_range(value: f32, (lo, hi): (f32, f32)) -> f32 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

impl EffectParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update_f32(field: &mut f32, tracker: &mut ChangeTracker, value: f32, range: (f32, f32)) {
        let value = clamp_range(value, range);
        if value.to_bits() != field.to_bits() {
            *field = value;
            tracker.changed();
        }
    }

    fn update_bool(field: &mut bool, tracker: &mut ChangeTracker, value: bool) {
        if *field != value {
            *field = value;
            tracker.changed();
        }
    }

    /// Sets the sampling radius in world units. Clamped to 0.5–2.0.
    pub fn set_worldspace_radius(&mut self, radius: f32) {
        Self::update_f32(
            &mut self.worldspace_radius,
            &mut self.tracker,
            radius,
            WORLDSPACE_RADIUS_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn worldspace_radius(&self) -> f32 {
        self.worldspace_radius
    }

    /// Sets the minimum self-occlusion bias. Clamped to 0.0–0.1.
    ///
    /// The bias actually applied grows with the sample's view depth.
    pub fn set_baseline_depth_bias(&mut self, bias: f32) {
        Self::update_f32(
            &mut self.baseline_depth_bias,
            &mut self.tracker,
            bias,
            BASELINE_DEPTH_BIAS_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn baseline_depth_bias(&self) -> f32 {
        self.baseline_depth_bias
    }

    /// Sets the obscurance strength multiplier. Clamped to 0.5–2.0.
    pub fn set_intensity_modifier(&mut self, intensity: f32) {
        Self::update_f32(
            &mut self.intensity_modifier,
            &mut self.tracker,
            intensity,
            INTENSITY_MODIFIER_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn intensity_modifier(&self) -> f32 {
        self.intensity_modifier
    }

    /// Enables rejection of samples farther than the radius.
    ///
    /// Enabled: white halos at depth discontinuities. Disabled: black halos.
    pub fn set_range_cutoff(&mut self, enabled: bool) {
        Self::update_bool(&mut self.range_cutoff, &mut self.tracker, enabled);
    }

    #[inline]
    #[must_use]
    pub fn range_cutoff(&self) -> bool {
        self.range_cutoff
    }

    /// Sets the spatial extent of the bilateral blur. Clamped to 0.5–2.0.
    pub fn set_bilateral_filter_radius(&mut self, radius: f32) {
        Self::update_f32(
            &mut self.bilateral_filter_radius,
            &mut self.tracker,
            radius,
            BILATERAL_FILTER_RADIUS_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn bilateral_filter_radius(&self) -> f32 {
        self.bilateral_filter_radius
    }

    /// Sets the depth difference beyond which blur neighbors are rejected.
    /// Clamped to 0.01–4.0.
    pub fn set_filter_cutoff_radius(&mut self, radius: f32) {
        Self::update_f32(
            &mut self.filter_cutoff_radius,
            &mut self.tracker,
            radius,
            FILTER_CUTOFF_RADIUS_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn filter_cutoff_radius(&self) -> f32 {
        self.filter_cutoff_radius
    }

    /// Sets the divide-by-zero guard of the bilateral weights.
    pub fn set_bilateral_epsilon(&mut self, epsilon: f32) {
        Self::update_f32(
            &mut self.bilateral_epsilon,
            &mut self.tracker,
            epsilon,
            BILATERAL_EPSILON_RANGE,
        );
    }

    #[inline]
    #[must_use]
    pub fn bilateral_epsilon(&self) -> f32 {
        self.bilateral_epsilon
    }

    /// Routes the output to direct display instead of compositing.
    pub fn set_show_debug_only(&mut self, enabled: bool) {
        Self::update_bool(&mut self.show_debug_only, &mut self.tracker, enabled);
    }

    #[inline]
    #[must_use]
    pub fn show_debug_only(&self) -> bool {
        self.show_debug_only
    }

    /// Output sink selected by [`Self::show_debug_only`].
    #[must_use]
    pub fn output_sink(&self) -> OutputSink {
        if self.show_debug_only {
            OutputSink::DebugView
        } else {
            OutputSink::Composite
        }
    }

    /// Blur taps on each side of the center pixel.
    #[must_use]
    pub fn blur_half_width(&self) -> u32 {
        (self.bilateral_filter_radius * BLUR_TAPS_PER_UNIT).ceil() as u32
    }

    /// Standard deviation of the spatial blur kernel, in pixels.
    #[must_use]
    pub fn blur_sigma(&self) -> f32 {
        (self.blur_half_width() as f32 * 0.5).max(0.5)
    }

    /// Version bumped by every effective change.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.tracker.version()
    }
}

// ============================================================================
// GPU Uniform Struct
// ============================================================================

define_gpu_data_struct!(
    /// Uniforms shared by every kernel of the obscurance pass.
    struct DaoUniforms {
        pub inverse_projection: Mat4 = Mat4::IDENTITY,
        pub view: Mat4 = Mat4::IDENTITY,
        /// Offsets in `[slice][axis][vector]` order.
        pub sample_data: UniformArray<Vec4, 16>,
        /// Unit-range encoded rotations, one per slice.
        pub rotations: UniformArray<Vec4, 4>,
        pub full_size: Vec2,
        pub half_size: Vec2,
        pub tan_half_fov: f32 = 1.0,
        pub far_plane: f32 = 1000.0,
        pub worldspace_radius: f32 = 0.5,
        pub baseline_depth_bias: f32 = 0.001,
        pub intensity: f32 = 1.0,
        pub range_cutoff: u32 = 1,
        pub blur_half_width: u32 = 2,
        pub blur_sigma: f32 = 1.0,
        pub filter_cutoff_radius: f32 = 0.5,
        pub bilateral_epsilon: f32 = 1e-4,
        pub normal_space: u32,
        pub normal_encoding: u32,
    }
);

impl DaoUniforms {
    /// Packs the per-frame state read by the kernels.
    #[must_use]
    pub fn build(
        params: &EffectParameters,
        camera: &CameraParams,
        samples: &SampleSet,
        gbuffer: &GBufferLayout,
    ) -> Self {
        let full = Vec2::new(camera.width as f32, camera.height as f32);
        Self {
            inverse_projection: camera.inverse_projection,
            view: camera.view,
            sample_data: samples.dispatch_ordered().into(),
            rotations: samples.encoded_rotations().into(),
            full_size: full,
            half_size: full * 0.5,
            tan_half_fov: camera.tan_half_fov(),
            far_plane: camera.far,
            worldspace_radius: params.worldspace_radius(),
            baseline_depth_bias: params.baseline_depth_bias(),
            intensity: params.intensity_modifier(),
            range_cutoff: u32::from(params.range_cutoff()),
            blur_half_width: params.blur_half_width(),
            blur_sigma: params.blur_sigma(),
            filter_cutoff_radius: params.filter_cutoff_radius(),
            bilateral_epsilon: params.bilateral_epsilon(),
            normal_space: gbuffer.normal_space_code(),
            normal_encoding: gbuffer.normal_encoding_code(),
        }
    }
}
