//! Render Node Trait
//!
//! Abstract interface of a node in the render graph. Each node is one pass
//! or compute task.

use super::context::{ExecuteContext, PrepareContext};

/// A pass in the render graph.
///
/// - `prepare` receives the mutable [`PrepareContext`] and performs every
///   allocation, upload and bind group build.
/// - `run` receives the read-only [`ExecuteContext`] plus the frame's
///   `CommandEncoder` and only records commands.
pub trait RenderNode {
    /// Node name, used for debug groups and logging.
    fn name(&self) -> &str;

    /// Prepare phase: allocate resources, upload uniforms, build bind groups.
    fn prepare(&mut self, _ctx: &mut PrepareContext) {}

    /// Execute phase: record GPU commands.
    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder);
}
