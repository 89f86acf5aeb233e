//! G-Buffer normal layout
//!
//! Describes how the host stores normals in its G-buffer so the deinterleaving
//! stage can turn them into unit view-space vectors.

use glam::{Mat4, Vec3};

/// Coordinate space of the stored normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalSpace {
    /// Already in view space.
    #[default]
    View,
    /// World space; rotated by the camera view matrix on deinterleave.
    World,
}

/// Numeric encoding of the stored normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalEncoding {
    /// Components stored directly in `[-1, 1]`.
    #[default]
    Signed,
    /// Components stored as `n * 0.5 + 0.5` in `[0, 1]`.
    Unorm,
}

/// Normal layout of the host G-buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GBufferLayout {
    pub normal_space: NormalSpace,
    pub normal_encoding: NormalEncoding,
}

impl GBufferLayout {
    /// Decodes a stored normal into view space.
    ///
    /// The result is **not** normalized: a zero-length stored normal stays
    /// zero so the evaluator can treat it as "no occlusion".
    #[must_use]
    pub fn decode_normal(&self, stored: Vec3, view: &Mat4) -> Vec3 {
        let n = match self.normal_encoding {
            NormalEncoding::Signed => stored,
            NormalEncoding::Unorm => stored * 2.0 - Vec3::ONE,
        };
        match self.normal_space {
            NormalSpace::View => n,
            NormalSpace::World => view.transform_vector3(n),
        }
    }

    /// Shader-side code of [`Self::normal_space`].
    #[must_use]
    pub const fn normal_space_code(&self) -> u32 {
        match self.normal_space {
            NormalSpace::View => 0,
            NormalSpace::World => 1,
        }
    }

    /// Shader-side code of [`Self::normal_encoding`].
    #[must_use]
    pub const fn normal_encoding_code(&self) -> u32 {
        match self.normal_encoding {
            NormalEncoding::Signed => 0,
            NormalEncoding::Unorm => 1,
        }
    }
}
