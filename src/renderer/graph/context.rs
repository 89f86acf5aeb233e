//! Render Graph Context System
//!
//! Provides two phase-separated contexts for the render graph:
//!
//! - [`PrepareContext`]: Mutable context for the **prepare** phase. Passes
//!   allocate transient resources, upload uniforms and build bind groups here.
//!
//! - [`ExecuteContext`]: Immutable context for the **execute** phase. Passes
//!   record GPU commands here.
//!
//! Both contexts store individual references to the subsystems, so the borrow
//! checker can split borrows across disjoint fields.

use rustc_hash::FxHashMap;

use crate::camera::CameraParams;
use crate::renderer::graph::transient_pool::{TransientId, TransientPool};
use crate::resources::dao::EffectParameters;

// ─── Frame Inputs ─────────────────────────────────────────────────────────────

/// Host-provided inputs of one frame.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Full-resolution linear view depth (`R32Float`).
    pub depth: &'a wgpu::Texture,
    /// Full-resolution G-buffer normals (`Rgba16Float`, xyz used).
    pub normals: &'a wgpu::Texture,
    pub camera: &'a CameraParams,
    pub params: &'a EffectParameters,
}

// ─── Blackboard ───────────────────────────────────────────────────────────────

/// Cross-pass handoff of transient outputs, keyed by well-known slot names.
///
/// Cleared at the start of every frame.
#[derive(Debug, Default)]
pub struct Blackboard {
    slots: FxHashMap<&'static str, TransientId>,
}

impl Blackboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `id` under `slot`, replacing any previous entry.
    pub fn publish(&mut self, slot: &'static str, id: TransientId) {
        self.slots.insert(slot, id);
    }

    #[must_use]
    pub fn get(&self, slot: &str) -> Option<TransientId> {
        self.slots.get(slot).copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ─── Prepare Context ──────────────────────────────────────────────────────────

/// Mutable context available during the **prepare** phase.
pub struct PrepareContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Transient resource pool (per-frame temporary allocations)
    pub transient_pool: &'a mut TransientPool,
    /// Published outputs for downstream consumers
    pub blackboard: &'a mut Blackboard,
    pub inputs: FrameInputs<'a>,
}

// ─── Execute Context ──────────────────────────────────────────────────────────

/// Read-only context available during the **execute** phase.
pub struct ExecuteContext<'a> {
    pub transient_pool: &'a TransientPool,
    pub blackboard: &'a Blackboard,
}
