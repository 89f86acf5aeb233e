//! CPU Reference Kernels
//!
//! Each stage of the obscurance pipeline is written as a per-invocation
//! kernel and driven by [`dispatch_2d`], which walks a grid of fixed-size
//! work-groups exactly the way the GPU dispatches the WGSL kernels. Work-group
//! counts are ceil-divided, and invocations that fall outside the target exit
//! without writing.
//!
//! ```text
//! depth + normals ──► deinterleave ──► DepthNormalSliceVolume (4 × half-res)
//!                                              │
//!                          evaluate (4 slices × {X, Y})
//!                                              ▼
//!                                      RawObscuranceVolume
//!                                              │
//!                                          assemble
//!                                              ▼
//!                               blur(X) ──► blur(Y) ──► output
//! ```

pub mod assemble;
pub mod blur;
pub mod deinterleave;
pub mod evaluate;

use crate::resources::sample_set::{Axis, SLICE_COUNT};
use crate::resources::texture::{DepthNormalTexel, Texture2D, TextureArray};

pub use assemble::assemble;
pub use blur::{bilateral_weight, blur};
pub use deinterleave::deinterleave;
pub use evaluate::{evaluate, sample_contribution};

/// Invocations per work-group along x and y.
pub const WORKGROUP_SIZE: (u32, u32) = (16, 12);

/// Work-groups needed to cover `width × height` invocations.
#[inline]
#[must_use]
pub fn workgroup_count(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE.0),
        height.div_ceil(WORKGROUP_SIZE.1),
    )
}

/// Runs `kernel` once per texel of `target`, grouped into work-groups.
///
/// Every texel is written exactly once; the order across work-groups is
/// unspecified, so kernels must not read `target`.
pub fn dispatch_2d<T: Copy>(target: &mut Texture2D<T>, mut kernel: impl FnMut(u32, u32) -> T) {
    let (width, height) = target.size();
    let (groups_x, groups_y) = workgroup_count(width, height);
    let texels = target.texels_mut();

    for group_y in 0..groups_y {
        for group_x in 0..groups_x {
            for local_y in 0..WORKGROUP_SIZE.1 {
                let y = group_y * WORKGROUP_SIZE.1 + local_y;
                if y >= height {
                    break;
                }
                for local_x in 0..WORKGROUP_SIZE.0 {
                    let x = group_x * WORKGROUP_SIZE.0 + local_x;
                    if x >= width {
                        break;
                    }
                    texels[(y as usize) * (width as usize) + x as usize] = kernel(x, y);
                }
            }
        }
    }
}

/// Full-resolution pixel sampled by half-res texel `(x, y)` of `slice`.
///
/// Slices map row-major onto the 2×2 pixel block: slice 0 is top-left,
/// 1 top-right, 2 bottom-left, 3 bottom-right.
#[inline]
#[must_use]
pub const fn slice_to_full(slice: usize, x: u32, y: u32) -> (u32, u32) {
    (2 * x + (slice % 2) as u32, 2 * y + (slice / 2) as u32)
}

// ============================================================================
// Intermediate volumes
// ============================================================================

/// Half-resolution depth/normal layers produced by the deinterleaver.
///
/// Each texel holds `(normal.xyz, linear_depth)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthNormalSliceVolume {
    layers: TextureArray<DepthNormalTexel>,
}

impl DepthNormalSliceVolume {
    pub(crate) fn new(half_width: u32, half_height: u32) -> Self {
        Self {
            layers: TextureArray::new(half_width, half_height, SLICE_COUNT, DepthNormalTexel::ZERO),
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.layers.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.layers.height()
    }

    #[inline]
    #[must_use]
    pub fn layer(&self, slice: usize) -> &Texture2D<DepthNormalTexel> {
        self.layers.layer(slice)
    }

    #[inline]
    pub(crate) fn layer_mut(&mut self, slice: usize) -> &mut Texture2D<DepthNormalTexel> {
        self.layers.layer_mut(slice)
    }

    /// Depth channel of one layer.
    #[must_use]
    pub fn depth_layer(&self, slice: usize) -> Texture2D<f32> {
        let layer = self.layer(slice);
        Texture2D::from_fn(layer.width(), layer.height(), |x, y| layer.get(x, y).w)
    }
}

/// Half-resolution raw obscurance, one X plane and one Y plane per slice.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObscuranceVolume {
    width: u32,
    height: u32,
    /// Indexed `[slice * 2 + axis]`.
    planes: Vec<Texture2D<f32>>,
}

impl RawObscuranceVolume {
    #[must_use]
    pub fn new(half_width: u32, half_height: u32) -> Self {
        Self {
            width: half_width,
            height: half_height,
            planes: (0..SLICE_COUNT * Axis::ALL.len())
                .map(|_| Texture2D::new(half_width, half_height, 0.0))
                .collect(),
        }
    }

    /// Builds a volume whose X and Y planes both carry `layers`.
    ///
    /// Assembling such a volume reinterleaves `layers` without loss.
    #[must_use]
    pub fn from_layers(layers: &TextureArray<f32>) -> Self {
        let mut volume = Self::new(layers.width(), layers.height());
        for slice in 0..SLICE_COUNT {
            for axis in Axis::ALL {
                *volume.plane_mut(slice, axis) = layers.layer(slice).clone();
            }
        }
        volume
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn plane(&self, slice: usize, axis: Axis) -> &Texture2D<f32> {
        &self.planes[slice * Axis::ALL.len() + axis.index()]
    }

    #[inline]
    pub fn plane_mut(&mut self, slice: usize, axis: Axis) -> &mut Texture2D<f32> {
        &mut self.planes[slice * Axis::ALL.len() + axis.index()]
    }
}
