//! Obscurance Pipeline (CPU reference executor)
//!
//! Runs the five stages in order on CPU textures:
//!
//! ```text
//! Deinterleave → Evaluate (4 slices × 2 axes) → Assemble → Blur X → Blur Y
//! ```
//!
//! Intermediate lifetimes follow the stage order: each stage takes its input
//! by value or drops it right after its last reader, so no intermediate
//! outlives the stage that consumes it.
//!
//! The GPU executor ([`DaoPass`](crate::renderer::graph::passes::DaoPass))
//! runs the same math through WGSL kernels.

use crate::camera::CameraParams;
use crate::compute::{self, deinterleave::validate_inputs};
use crate::errors::Result;
use crate::host::HostCapabilities;
use crate::resources::dao::{EffectParameters, OutputSink};
use crate::resources::gbuffer::GBufferLayout;
use crate::resources::sample_set::{Axis, SampleGrouping, SampleSet, SampleSetGenerator};
use crate::resources::texture::{DepthTexture, NormalTexture, ObscuranceTexture};

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ObscuranceFrame {
    /// Full-resolution filtered obscurance, values in `[0, 1]`.
    pub texture: ObscuranceTexture,
    /// Where the host should route [`Self::texture`].
    pub sink: OutputSink,
}

/// A configured obscurance pipeline.
///
/// The sample set is generated once in [`ObscurancePipeline::new`] and stays
/// constant for the lifetime of the instance.
#[derive(Debug, Clone)]
pub struct ObscurancePipeline {
    samples: SampleSet,
    gbuffer: GBufferLayout,
}

impl ObscurancePipeline {
    /// Validates the host and generates the sample set from `seed`.
    pub fn new(
        host: &HostCapabilities,
        gbuffer: GBufferLayout,
        grouping: SampleGrouping,
        seed: u64,
    ) -> Result<Self> {
        if let Err(err) = host.validate() {
            log::error!("Ambient obscurance disabled: {err}");
            return Err(err);
        }
        let samples = SampleSetGenerator::new(grouping).generate(seed);
        log::debug!("Created obscurance pipeline ({grouping:?} grouping, seed {seed})");
        Ok(Self { samples, gbuffer })
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    #[inline]
    #[must_use]
    pub fn gbuffer(&self) -> &GBufferLayout {
        &self.gbuffer
    }

    /// Runs every stage for one frame.
    ///
    /// Resolution problems are reported before any stage runs.
    pub fn execute(
        &self,
        depth: &DepthTexture,
        normals: &NormalTexture,
        camera: &CameraParams,
        params: &EffectParameters,
    ) -> Result<ObscuranceFrame> {
        if let Err(err) = validate_inputs(depth, normals, camera) {
            log::warn!("Skipping obscurance frame: {err}");
            return Err(err);
        }
        let (width, height) = depth.size();

        log::trace!("allocate depth/normal slice volume");
        let slices = compute::deinterleave(depth, normals, camera, &self.gbuffer)?;

        log::trace!("allocate raw obscurance volume");
        let raw = compute::evaluate(&slices, camera, &self.samples, params);
        drop(slices);
        log::trace!("released depth/normal slice volume");

        log::trace!("allocate assembled obscurance ({width}x{height})");
        let assembled = compute::assemble(raw);

        log::trace!("allocate blur X target");
        let blurred_x = compute::blur(&assembled, depth, Axis::X, params);
        drop(assembled);
        log::trace!("released assembled obscurance");

        log::trace!("allocate blur Y target");
        let texture = compute::blur(&blurred_x, depth, Axis::Y, params);
        drop(blurred_x);
        log::trace!("released blur X target");

        Ok(ObscuranceFrame {
            texture,
            sink: params.output_sink(),
        })
    }
}
