#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Deinterleaved screen-space ambient obscurance.
//!
//! Four half-resolution slices of the depth/normal buffers are evaluated
//! independently along two rotated axes, reassembled at full resolution and
//! smoothed with a separable depth-aware bilateral blur.
//!
//! Two executors share the same math:
//! - [`ObscurancePipeline`]: CPU reference executor over [`Texture2D`]s
//! - [`renderer::DaoPass`]: wgpu compute pass recorded through the render graph

pub mod camera;
pub mod compute;
pub mod errors;
pub mod host;
pub mod pipeline;
pub mod renderer;
pub mod resources;

pub use camera::CameraParams;
pub use errors::{DaoError, Result};
pub use host::{HostCapabilities, RenderingPath};
pub use pipeline::{ObscuranceFrame, ObscurancePipeline};
pub use resources::{
    EffectParameters, FILTERED_OBSCURANCE_SLOT, GBufferLayout, OutputSink, SampleGrouping,
    SampleSet, SampleSetGenerator, Texture2D,
};
