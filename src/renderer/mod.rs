//! GPU executor: render graph plumbing, shader templates and the compute pass.

pub mod graph;
pub mod pipeline;

pub use graph::passes::DaoPass;
pub use graph::{Blackboard, FrameInputs, RenderGraph, RenderNode, TransientPool};
pub use pipeline::ShaderManager;
