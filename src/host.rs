//! Host Capabilities
//!
//! The effect consumes a deferred G-buffer and writes into an HDR lighting
//! target, and every stage is a compute dispatch. [`HostCapabilities`]
//! describes what the host renderer and device provide so both executors can
//! refuse to start on an unsupported configuration.

use crate::errors::{DaoError, Result};

/// Lighting path used by the host camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingPath {
    #[default]
    Deferred,
    Forward,
}

/// What the host renderer and device support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostCapabilities {
    pub rendering_path: RenderingPath,
    /// The camera renders into a floating-point target.
    pub hdr: bool,
    /// The device can run compute shaders.
    pub compute: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            rendering_path: RenderingPath::Deferred,
            hdr: true,
            compute: true,
        }
    }
}

impl HostCapabilities {
    /// Capabilities of a deferred HDR host on `adapter`.
    #[must_use]
    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        let compute = adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS);
        Self {
            compute,
            ..Self::default()
        }
    }

    /// Checks that the effect can run on this host.
    ///
    /// The caller is expected to disable the effect for the rest of the
    /// session when this fails.
    pub fn validate(&self) -> Result<()> {
        if !self.compute {
            return Err(DaoError::ComputeUnsupported);
        }
        if self.rendering_path != RenderingPath::Deferred {
            return Err(DaoError::IncompatibleHost(
                "the camera must use the deferred rendering path".into(),
            ));
        }
        if !self.hdr {
            return Err(DaoError::IncompatibleHost(
                "the camera must render into an HDR target".into(),
            ));
        }
        Ok(())
    }
}
