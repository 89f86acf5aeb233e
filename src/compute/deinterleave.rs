//! Depth/normal deinterleaving.
//!
//! Splits the full-resolution inputs into four half-resolution layers, one
//! per position inside each 2×2 pixel block:
//!
//! ```text
//! V[layer][x, y] = (N[p], D[p]),  p = (2x + layer % 2, 2y + layer / 2)
//! ```

use crate::camera::CameraParams;
use crate::errors::{DaoError, Result, check_resolution};
use crate::resources::gbuffer::GBufferLayout;
use crate::resources::sample_set::SLICE_COUNT;
use crate::resources::texture::{DepthNormalTexel, DepthTexture, NormalTexture};

use super::{DepthNormalSliceVolume, dispatch_2d, slice_to_full};

/// Checks that the inputs can be deinterleaved.
///
/// The depth buffer must be non-empty with even dimensions, and both the
/// normal buffer and the camera must match it.
pub fn validate_inputs(
    depth: &DepthTexture,
    normals: &NormalTexture,
    camera: &CameraParams,
) -> Result<()> {
    let (width, height) = depth.size();
    check_resolution(width, height)?;

    if normals.size() != depth.size() {
        return Err(DaoError::ResolutionMismatch {
            what: "normal buffer",
            expected: depth.size(),
            actual: normals.size(),
        });
    }
    if camera.size() != depth.size() {
        return Err(DaoError::ResolutionMismatch {
            what: "camera target",
            expected: depth.size(),
            actual: camera.size(),
        });
    }
    Ok(())
}

/// Deinterleaves `depth` and `normals` into a [`DepthNormalSliceVolume`].
///
/// Normals are decoded to view space according to `gbuffer`. Returns a
/// configuration error, before touching any texel, when the inputs fail
/// [`validate_inputs`].
pub fn deinterleave(
    depth: &DepthTexture,
    normals: &NormalTexture,
    camera: &CameraParams,
    gbuffer: &GBufferLayout,
) -> Result<DepthNormalSliceVolume> {
    validate_inputs(depth, normals, camera)?;

    let mut volume = DepthNormalSliceVolume::new(depth.width() / 2, depth.height() / 2);
    for slice in 0..SLICE_COUNT {
        dispatch_2d(volume.layer_mut(slice), |x, y| {
            let (fx, fy) = slice_to_full(slice, x, y);
            let n = gbuffer.decode_normal(normals.get(fx, fy), &camera.view);
            DepthNormalTexel::new(n.x, n.y, n.z, depth.get(fx, fy))
        });
    }
    Ok(volume)
}
