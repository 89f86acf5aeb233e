//! Transient Resource Pool
//!
//! Provides GPU textures and storage buffers for short-lived intermediates.
//! Passes allocate in the **prepare** phase and bind in the **execute** phase.
//!
//! # Design
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  TransientPool                      │
//! │                                                     │
//! │  entries: [PoolEntry]  ←── indexed by Id            │
//! │                                                     │
//! │  allocate_texture() → Id  (prepare, &mut self)      │
//! │  allocate_buffer()  → Id  (prepare, &mut self)      │
//! │  release(Id)              (prepare, &mut self)      │
//! │  get_view(Id) / get_buffer(Id)  (execute, &self)    │
//! │  reset() / abort_frame()  (end of frame)            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Per-stage lifetimes
//!
//! An intermediate is released as soon as the last pass reading it has been
//! scheduled. A released entry can be handed to a later allocation with the
//! same key in the same frame; both ids then alias one GPU resource. Passes
//! recorded into one encoder run in order, so the earlier reader has finished
//! before the later writer starts.
//!
//! Ids stay resolvable until [`TransientPool::reset`], even after release.
//!
//! # Memory Strategy
//!
//! - Resources are **never** destroyed during normal rendering; they remain
//!   in the pool for reuse.
//! - The pool grows on demand when no compatible free entry exists.
//! - Call [`TransientPool::trim`] after resolution changes to drop entries
//!   that have sat unused for several frames.

/// Handle to a transient resource allocated from the pool.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TransientId(u32);

/// Descriptor for requesting a transient texture.
#[derive(Clone, Debug)]
pub struct TransientTextureDesc {
    pub width: u32,
    pub height: u32,
    pub array_layers: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
    pub label: &'static str,
}

/// Descriptor for requesting a transient storage buffer.
#[derive(Clone, Debug)]
pub struct TransientBufferDesc {
    pub size: u64,
    pub usage: wgpu::BufferUsages,
    pub label: &'static str,
}

// ─── Internal Types ───────────────────────────────────────────────────────────

/// Recycling key. Usages must match exactly or bindings fail validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PoolKey {
    Texture {
        width: u32,
        height: u32,
        array_layers: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    },
    Buffer {
        size: u64,
        usage: wgpu::BufferUsages,
    },
}

enum PooledResource {
    Texture {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    Buffer(wgpu::Buffer),
}

struct PoolEntry {
    key: PoolKey,
    resource: PooledResource,
    in_use: bool,
    /// Frames this entry has gone without an allocation.
    idle_frames: u32,
    used_this_frame: bool,
}

fn create_texture(device: &wgpu::Device, desc: &TransientTextureDesc) -> PooledResource {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size: wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: desc.array_layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: desc.format,
        usage: desc.usage,
        view_formats: &[],
    });

    let dimension = if desc.array_layers > 1 {
        wgpu::TextureViewDimension::D2Array
    } else {
        wgpu::TextureViewDimension::D2
    };
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(desc.label),
        dimension: Some(dimension),
        ..Default::default()
    });

    PooledResource::Texture { texture, view }
}

fn create_buffer(device: &wgpu::Device, desc: &TransientBufferDesc) -> PooledResource {
    PooledResource::Buffer(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(desc.label),
        size: desc.size,
        usage: desc.usage,
        mapped_at_creation: false,
    }))
}

// ─── Pool Implementation ──────────────────────────────────────────────────────

/// GPU resource pool for transient per-frame allocations.
///
/// # Thread Safety
///
/// The pool is **not** `Sync`. The prepare phase requires `&mut self`; the
/// execute phase only needs `&self`. The borrow split between
/// `PrepareContext` and `ExecuteContext` enforces this statically.
#[derive(Default)]
pub struct TransientPool {
    entries: Vec<PoolEntry>,
}

impl TransientPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(
        &mut self,
        key: PoolKey,
        create: impl FnOnce() -> PooledResource,
    ) -> TransientId {
        let index = if let Some(index) = self.entries.iter().position(|e| !e.in_use && e.key == key)
        {
            index
        } else {
            self.entries.push(PoolEntry {
                key,
                resource: create(),
                in_use: false,
                idle_frames: 0,
                used_this_frame: false,
            });
            self.entries.len() - 1
        };

        let entry = &mut self.entries[index];
        entry.in_use = true;
        entry.used_this_frame = true;
        entry.idle_frames = 0;
        log::trace!("transient allocate #{index}: {key:?}");
        TransientId(index as u32)
    }

    // ── Prepare phase (requires &mut self) ─────────────────────────────────

    /// Allocates a texture matching `desc`, reusing a free entry if possible.
    pub fn allocate_texture(
        &mut self,
        device: &wgpu::Device,
        desc: &TransientTextureDesc,
    ) -> TransientId {
        let key = PoolKey::Texture {
            width: desc.width,
            height: desc.height,
            array_layers: desc.array_layers,
            format: desc.format,
            usage: desc.usage,
        };
        self.acquire(key, || create_texture(device, desc))
    }

    /// Allocates a buffer matching `desc`, reusing a free entry if possible.
    pub fn allocate_buffer(
        &mut self,
        device: &wgpu::Device,
        desc: &TransientBufferDesc,
    ) -> TransientId {
        let key = PoolKey::Buffer {
            size: desc.size,
            usage: desc.usage,
        };
        self.acquire(key, || create_buffer(device, desc))
    }

    /// Returns `id` to the pool once its last reader has been scheduled.
    pub fn release(&mut self, id: TransientId) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.in_use = false;
            log::trace!("transient release #{}", id.0);
        }
    }

    // ── Execute phase (requires &self only) ────────────────────────────────

    /// View of a transient texture (2D, or 2D-array when layered).
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a buffer.
    #[must_use]
    #[inline]
    pub fn get_view(&self, id: TransientId) -> &wgpu::TextureView {
        match &self.entries[id.0 as usize].resource {
            PooledResource::Texture { view, .. } => view,
            PooledResource::Buffer(_) => panic!("transient #{} is a buffer", id.0),
        }
    }

    /// Raw texture, for copies.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a buffer.
    #[must_use]
    #[inline]
    pub fn get_texture(&self, id: TransientId) -> &wgpu::Texture {
        match &self.entries[id.0 as usize].resource {
            PooledResource::Texture { texture, .. } => texture,
            PooledResource::Buffer(_) => panic!("transient #{} is a buffer", id.0),
        }
    }

    /// Transient storage buffer.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a texture.
    #[must_use]
    #[inline]
    pub fn get_buffer(&self, id: TransientId) -> &wgpu::Buffer {
        match &self.entries[id.0 as usize].resource {
            PooledResource::Buffer(buffer) => buffer,
            PooledResource::Texture { .. } => panic!("transient #{} is a texture", id.0),
        }
    }

    /// Whether `id` is currently allocated.
    #[must_use]
    pub fn is_in_use(&self, id: TransientId) -> bool {
        self.entries.get(id.0 as usize).is_some_and(|e| e.in_use)
    }

    /// Number of entries currently allocated.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.entries.iter().filter(|e| e.in_use).count()
    }

    // ── Frame boundary ─────────────────────────────────────────────────────

    /// Returns every entry to the pool at the end of a frame, including the
    /// published output once the host has consumed it.
    ///
    /// All previously returned ids become invalid.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.in_use = false;
            if entry.used_this_frame {
                entry.used_this_frame = false;
            } else {
                entry.idle_frames += 1;
            }
        }
    }

    /// Releases everything allocated this frame without publishing.
    ///
    /// Ids already published on a [`Blackboard`](super::context::Blackboard)
    /// stay there; use [`RenderGraph::abort_frame`](super::graph::RenderGraph::abort_frame)
    /// to drop both.
    pub fn abort_frame(&mut self) {
        let outstanding = self.in_use_count();
        if outstanding > 0 {
            log::warn!("Aborting frame with {outstanding} transient resources outstanding");
        }
        self.reset();
    }

    /// Drops free entries that have been idle for more than `max_idle_frames`.
    ///
    /// Call between frames, after [`Self::reset`]; surviving entries are
    /// renumbered.
    pub fn trim(&mut self, max_idle_frames: u32) {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.in_use || e.idle_frames <= max_idle_frames);
        if self.entries.len() != before {
            log::debug!(
                "Trimmed {} idle transient resources",
                before - self.entries.len()
            );
        }
    }

    /// Total number of resources managed by the pool (in use and free).
    #[must_use]
    pub fn total_resource_count(&self) -> usize {
        self.entries.len()
    }
}
