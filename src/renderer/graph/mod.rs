//! Render graph plumbing for the compute passes.
//!
//! - [`RenderNode`]: the prepare/run protocol every pass implements
//! - [`PrepareContext`] / [`ExecuteContext`]: phase-separated contexts
//! - [`TransientPool`]: per-frame intermediates with per-stage release
//! - [`Blackboard`]: well-known output slots
//! - [`RenderGraph`]: linear executor sharing one encoder

pub mod context;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod node;
pub mod passes;
pub mod transient_pool;

pub use context::{Blackboard, ExecuteContext, FrameInputs, PrepareContext};
pub use graph::RenderGraph;
pub use node::RenderNode;
pub use transient_pool::{TransientBufferDesc, TransientId, TransientPool, TransientTextureDesc};
