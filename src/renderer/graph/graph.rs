//! Render Graph Executor
//!
//! `RenderGraph` runs its nodes in insertion order: every node prepares, then
//! every node records into a single `CommandEncoder`, which is submitted once.

use super::context::{Blackboard, ExecuteContext, FrameInputs, PrepareContext};
use super::node::RenderNode;
use super::transient_pool::TransientPool;

/// Linear list of render nodes sharing one encoder per frame.
#[derive(Default)]
pub struct RenderGraph {
    nodes: Vec<Box<dyn RenderNode>>,
}

impl RenderGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; nodes run in the order they are added.
    #[inline]
    pub fn add_node(&mut self, node: Box<dyn RenderNode>) {
        self.nodes.push(node);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Prepares and records every node, then submits.
    ///
    /// The blackboard is cleared first; outputs published by the nodes stay
    /// valid until the caller resets `transient_pool`.
    pub fn execute(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        transient_pool: &mut TransientPool,
        blackboard: &mut Blackboard,
        inputs: FrameInputs<'_>,
    ) -> wgpu::SubmissionIndex {
        blackboard.clear();

        {
            let mut ctx = PrepareContext {
                device,
                queue,
                transient_pool: &mut *transient_pool,
                blackboard: &mut *blackboard,
                inputs,
            };
            for node in &mut self.nodes {
                node.prepare(&mut ctx);
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Graph Encoder"),
        });

        let ctx = ExecuteContext {
            transient_pool: &*transient_pool,
            blackboard: &*blackboard,
        };
        for node in &self.nodes {
            encoder.push_debug_group(node.name());
            node.run(&ctx, &mut encoder);
            encoder.pop_debug_group();
        }

        queue.submit(std::iter::once(encoder.finish()))
    }

    /// Abandons the current frame.
    ///
    /// Clears the published slots together with the pool, so no stale id can
    /// be looked up after its resource has been returned.
    pub fn abort_frame(transient_pool: &mut TransientPool, blackboard: &mut Blackboard) {
        blackboard.clear();
        transient_pool.abort_frame();
    }
}
