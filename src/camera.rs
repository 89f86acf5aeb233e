//! Camera Parameters
//!
//! The projection data the obscurance pipeline consumes from the host camera.
//! The host updates it at most once per frame, before any dispatch.
//!
//! View space is right-handed with the camera looking down `-Z`; depth values
//! are positive linear view distances, so a reconstructed position always has
//! `z == -depth`.

use glam::{Mat4, Vec2, Vec3};

/// Projection parameters of the host camera for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Inverse of the projection matrix.
    pub inverse_projection: Mat4,
    /// World-to-view matrix.
    pub view: Mat4,
    /// Width / height.
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    /// Depth values at or beyond this distance are treated as background.
    pub far: f32,
    /// Pixel width of the camera target.
    pub width: u32,
    /// Pixel height of the camera target.
    pub height: u32,
}

impl CameraParams {
    /// Builds parameters for a right-handed perspective camera.
    #[must_use]
    pub fn perspective(fov_y: f32, width: u32, height: u32, near: f32, far: f32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        let projection = Mat4::perspective_rh(fov_y, aspect, near, far);
        Self {
            inverse_projection: projection.inverse(),
            view: Mat4::IDENTITY,
            aspect,
            fov_y,
            near,
            far,
            width,
            height,
        }
    }

    /// Replaces the world-to-view matrix.
    #[must_use]
    pub fn with_view(mut self, view: Mat4) -> Self {
        self.view = view;
        self
    }

    /// `tan(fov_y / 2)`.
    #[inline]
    #[must_use]
    pub fn tan_half_fov(&self) -> f32 {
        (self.fov_y * 0.5).tan()
    }

    /// Target size in pixels.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether `depth` describes visible geometry (not background).
    #[inline]
    #[must_use]
    pub fn is_geometry(&self, depth: f32) -> bool {
        depth.is_finite() && depth > 0.0 && depth < self.far
    }

    /// Reconstructs the view-space position of the surface seen at `uv`
    /// (origin top-left) with linear view depth `depth`.
    #[must_use]
    pub fn view_position(&self, uv: Vec2, depth: f32) -> Vec3 {
        let ndc = Vec3::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 1.0);
        let ray = self.inverse_projection.project_point3(ndc);
        ray * (depth / -ray.z)
    }

    /// Full-resolution pixels spanned by one view-space unit at `depth`.
    #[inline]
    #[must_use]
    pub fn pixels_per_unit(&self, depth: f32) -> f32 {
        self.height as f32 / (2.0 * self.tan_half_fov() * depth)
    }
}
