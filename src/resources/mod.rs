//! Core data definitions, independent of the GPU backend:
//! - `dao`: effect parameters, output sink and the GPU uniform struct
//! - `sample_set`: jittered sample offsets and slice rotations
//! - `gbuffer`: normal layout of the host G-buffer
//! - `texture`: CPU textures used by the reference executor
//! - `uniforms`: GPU struct macro and WGSL type mapping

pub mod dao;
pub mod gbuffer;
pub mod sample_set;
pub mod texture;
pub mod uniforms;
pub mod version_tracker;

pub use dao::{DEBUG_VIEW_SLOT, DaoUniforms, EffectParameters, FILTERED_OBSCURANCE_SLOT, OutputSink};
pub use gbuffer::{GBufferLayout, NormalEncoding, NormalSpace};
pub use sample_set::{
    Axis, RotationVector, SampleGrouping, SampleOffsetSet, SampleSet, SampleSetGenerator,
};
pub use texture::{DepthTexture, NormalTexture, ObscuranceTexture, Texture2D, TextureArray};
pub use uniforms::{UniformArray, WgslStruct, WgslType};
pub use version_tracker::ChangeTracker;
