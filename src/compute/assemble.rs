//! Slice assembly.
//!
//! Inverse of the deinterleaving map: each full-resolution pixel reads the
//! slice that owns its position in the 2×2 block and averages the X and Y
//! axis estimates stored there.

use crate::resources::sample_set::Axis;
use crate::resources::texture::ObscuranceTexture;

use super::{RawObscuranceVolume, dispatch_2d};

/// Recombines the four slices into one full-resolution texture.
///
/// Consumes `raw`; the volume is released as soon as assembly finishes.
#[must_use]
pub fn assemble(raw: RawObscuranceVolume) -> ObscuranceTexture {
    let mut output = ObscuranceTexture::new(raw.width() * 2, raw.height() * 2, 0.0);
    dispatch_2d(&mut output, |fx, fy| {
        let slice = ((fy % 2) * 2 + fx % 2) as usize;
        let (x, y) = (fx / 2, fy / 2);
        let a = raw.plane(slice, Axis::X).get(x, y);
        let b = raw.plane(slice, Axis::Y).get(x, y);
        (a + b) * 0.5
    });
    log::trace!(
        "released raw obscurance volume ({}x{} x 4 slices)",
        raw.width(),
        raw.height()
    );
    output
}
