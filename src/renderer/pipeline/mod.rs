//! Shader generation and module caching for the compute passes.

pub mod shader_manager;

pub use shader_manager::{ShaderManager, get_env, render_shader_source};

/// Template of the depth/normal deinterleaving kernel.
pub const DEINTERLEAVE_TEMPLATE: &str = "passes/dao_deinterleave";
/// Template of the directional evaluation kernels (`evaluate_x`, `evaluate_y`).
pub const EVALUATE_TEMPLATE: &str = "passes/dao_evaluate";
/// Template of the slice assembly kernel.
pub const ASSEMBLE_TEMPLATE: &str = "passes/dao_assemble";
/// Template of the bilateral blur kernels (`blur_x`, `blur_y`).
pub const BLUR_TEMPLATE: &str = "passes/dao_blur";
