//! Separable depth-aware bilateral blur.
//!
//! Each pass filters along one axis with a Gaussian spatial kernel multiplied
//! by a depth similarity term that falls to exactly zero once the depth
//! difference reaches `filter_cutoff_radius`:
//!
//! ```text
//! w(i, Δ) = exp(-i² / 2σ²) · (1 - Δ / (cutoff + ε))²   for Δ ≤ cutoff
//!         = 0                                         otherwise
//! ```
//!
//! Both passes weigh neighbors against the original full-resolution depth,
//! never against a filtered signal.

use crate::resources::dao::EffectParameters;
use crate::resources::sample_set::Axis;
use crate::resources::texture::{DepthTexture, ObscuranceTexture};

use super::dispatch_2d;

/// Combined spatial and depth weight of a neighbor `offset` pixels away whose
/// depth differs by `depth_delta`.
///
/// Peaks at `1.0` for `offset == 0, depth_delta == 0`.
#[must_use]
pub fn bilateral_weight(
    offset: i32,
    depth_delta: f32,
    sigma: f32,
    cutoff: f32,
    epsilon: f32,
) -> f32 {
    // NaN deltas come from two infinite background depths.
    if depth_delta.is_nan() || depth_delta.abs() > cutoff {
        return 0.0;
    }
    let i = offset as f32;
    let spatial = (-(i * i) / (2.0 * sigma * sigma)).exp();
    let similarity = 1.0 - depth_delta.abs() / (cutoff + epsilon);
    spatial * similarity * similarity
}

/// Runs one blur pass along `axis`.
///
/// Neighbors outside the image are skipped. A pixel whose neighborhood has no
/// weight at all keeps its input value.
#[must_use]
pub fn blur(
    input: &ObscuranceTexture,
    depth: &DepthTexture,
    axis: Axis,
    params: &EffectParameters,
) -> ObscuranceTexture {
    let (width, height) = input.size();
    let half_width = params.blur_half_width() as i32;
    let sigma = params.blur_sigma();
    let cutoff = params.filter_cutoff_radius();
    let epsilon = params.bilateral_epsilon();
    let step = axis.direction();
    let (step_x, step_y) = (step.x as i32, step.y as i32);

    let mut output = ObscuranceTexture::new(width, height, 0.0);
    dispatch_2d(&mut output, |x, y| {
        let center_depth = depth.get(x, y);
        let mut sum = 0.0;
        let mut total_weight = 0.0;

        for i in -half_width..=half_width {
            let sx = x as i32 + i * step_x;
            let sy = y as i32 + i * step_y;
            if sx < 0 || sy < 0 || sx >= width as i32 || sy >= height as i32 {
                continue;
            }
            let (sx, sy) = (sx as u32, sy as u32);
            let w = bilateral_weight(
                i,
                depth.get(sx, sy) - center_depth,
                sigma,
                cutoff,
                epsilon,
            );
            sum += w * input.get(sx, sy);
            total_weight += w;
        }

        let value = if total_weight > 0.0 {
            sum / total_weight
        } else {
            input.get(x, y)
        };
        value.clamp(0.0, 1.0)
    });
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_is_exactly_zero_past_cutoff() {
        assert!(bilateral_weight(0, 0.51, 1.0, 0.5, 1e-4) == 0.0);
        assert!(bilateral_weight(0, -0.51, 1.0, 0.5, 1e-4) == 0.0);
        assert!(bilateral_weight(0, f32::NAN, 1.0, 0.5, 1e-4) == 0.0);
    }

    #[test]
    fn test_constant_input_is_preserved() {
        let input = ObscuranceTexture::new(20, 10, 0.4);
        let depth = DepthTexture::new(20, 10, 3.0);
        let params = EffectParameters::default();
        for axis in Axis::ALL {
            let out = blur(&input, &depth, axis, &params);
            assert!(out.texels().iter().all(|v| (v - 0.4).abs() < 1e-6));
        }
    }
}
