//! Deinterleaved Ambient Obscurance (DAO) Compute Pass
//!
//! GPU executor of the obscurance pipeline. Five compute stages are recorded
//! into the frame encoder, one compute pass each:
//!
//! ```text
//!  depth (R32F) ──┐
//!                 ├─► Deinterleave ─► slice volume (RGBA32F, 4 layers, ½ res)
//!  normals ───────┘                          │
//!                              Evaluate X + Evaluate Y  (z = slice)
//!                                            ▼
//!                               raw volume (storage buffer, [slice][axis][y][x])
//!                                            │
//!                                        Assemble ─► assembled (R32F)
//!                                                        │
//!                                  Blur X ─► blur X (R32F) │ depth
//!                                                        ▼
//!                                  Blur Y ─► output (R32F) ─► Blackboard slot
//! ```
//!
//! # Resource lifetimes
//!
//! Every intermediate comes from the [`TransientPool`] and is released as
//! soon as the stage that last reads it has been scheduled, so later stages
//! may reuse its memory within the same frame. The final texture is
//! published under the slot selected by the [`OutputSink`] and returned to
//! the pool by the host's end-of-frame `reset()`.
//!
//! # Performance
//!
//! - Shader modules and pipelines are created once in [`DaoPass::new`]
//! - The uniform buffer is re-uploaded only when the packed uniforms differ
//!   from the last upload
//! - The sample set is generated once per pass instance

use crate::compute::WORKGROUP_SIZE;
use crate::errors::{DaoError, Result, check_resolution};
use crate::host::HostCapabilities;
use crate::renderer::graph::context::{ExecuteContext, PrepareContext};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::graph::transient_pool::{
    TransientBufferDesc, TransientId, TransientPool, TransientTextureDesc,
};
use crate::renderer::pipeline::{
    ASSEMBLE_TEMPLATE, BLUR_TEMPLATE, DEINTERLEAVE_TEMPLATE, EVALUATE_TEMPLATE, ShaderManager,
};
use crate::resources::dao::{DaoUniforms, OutputSink};
use crate::resources::gbuffer::GBufferLayout;
use crate::resources::sample_set::{Axis, SLICE_COUNT, SampleGrouping, SampleSet, SampleSetGenerator};
use crate::resources::uniforms::WgslStruct;

/// Format of the deinterleaved depth/normal volume.
pub const SLICE_VOLUME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Format of every full-resolution obscurance texture.
pub const OBSCURANCE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

const OBSCURANCE_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::STORAGE_BINDING
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::COPY_SRC);

/// Template defines shared by every kernel of the pass.
#[must_use]
pub fn kernel_defines() -> [(&'static str, String); 3] {
    [
        (
            "struct_definitions",
            DaoUniforms::wgsl_struct_def("DaoUniforms"),
        ),
        ("workgroup_x", WORKGROUP_SIZE.0.to_string()),
        ("workgroup_y", WORKGROUP_SIZE.1.to_string()),
    ]
}

// ─── Layout helpers ───────────────────────────────────────────────────────────

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size_of::<DaoUniforms>() as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32, view_dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn storage_texture_entry(
    binding: u32,
    format: wgpu::TextureFormat,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format,
            view_dimension,
        },
        count: None,
    }
}

fn storage_buffer_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[Some(layout)],
        immediate_size: 0,
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        module,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn compile(
    shader_manager: &mut ShaderManager,
    device: &wgpu::Device,
    template: &str,
) -> Result<wgpu::ShaderModule> {
    let defines = kernel_defines();
    let defines: Vec<(&str, &str)> = defines.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (module, _hash) = shader_manager.get_or_compile_template(device, template, &defines)?;
    Ok(module.clone())
}

// ─── Pass ─────────────────────────────────────────────────────────────────────

struct Pipelines {
    deinterleave: wgpu::ComputePipeline,
    evaluate_x: wgpu::ComputePipeline,
    evaluate_y: wgpu::ComputePipeline,
    assemble: wgpu::ComputePipeline,
    blur_x: wgpu::ComputePipeline,
    blur_y: wgpu::ComputePipeline,
}

struct Layouts {
    deinterleave: wgpu::BindGroupLayout,
    evaluate: wgpu::BindGroupLayout,
    assemble: wgpu::BindGroupLayout,
    blur: wgpu::BindGroupLayout,
}

/// Per-frame bindings built in `prepare` and recorded in `run`.
struct FrameBindings {
    deinterleave: wgpu::BindGroup,
    evaluate: wgpu::BindGroup,
    assemble: wgpu::BindGroup,
    blur_x: wgpu::BindGroup,
    blur_y: wgpu::BindGroup,
    half_groups: (u32, u32),
    full_groups: (u32, u32),
    output: TransientId,
    sink: OutputSink,
}

/// Deinterleaved ambient obscurance pass.
///
/// Owns the compute pipelines, the uniform buffer and the sample set. The
/// final obscurance texture id is exposed through
/// [`output_id`](Self::output_id) and published on the blackboard.
pub struct DaoPass {
    samples: SampleSet,
    gbuffer: GBufferLayout,
    pipelines: Pipelines,
    layouts: Layouts,
    uniform_buffer: wgpu::Buffer,
    /// Contents of the uniform buffer after the last upload.
    uploaded: Option<DaoUniforms>,
    frame: Option<FrameBindings>,
    last_error: Option<DaoError>,
}

impl DaoPass {
    /// Checks that `adapter` can run the pass.
    pub fn check_adapter(adapter: &wgpu::Adapter) -> Result<()> {
        HostCapabilities::from_adapter(adapter)
            .validate()
            .inspect_err(|err| log::error!("Ambient obscurance disabled: {err}"))
    }

    /// Validates the host, compiles the kernels and generates the sample set.
    ///
    /// On error the host should disable the effect for the session.
    pub fn new(
        device: &wgpu::Device,
        shader_manager: &mut ShaderManager,
        host: &HostCapabilities,
        gbuffer: GBufferLayout,
        grouping: SampleGrouping,
        seed: u64,
    ) -> Result<Self> {
        Self::build(device, shader_manager, host, gbuffer, grouping, seed)
            .inspect_err(|err| log::error!("Ambient obscurance disabled: {err}"))
    }

    fn build(
        device: &wgpu::Device,
        shader_manager: &mut ShaderManager,
        host: &HostCapabilities,
        gbuffer: GBufferLayout,
        grouping: SampleGrouping,
        seed: u64,
    ) -> Result<Self> {
        host.validate()?;

        let deinterleave_module = compile(shader_manager, device, DEINTERLEAVE_TEMPLATE)?;
        let evaluate_module = compile(shader_manager, device, EVALUATE_TEMPLATE)?;
        let assemble_module = compile(shader_manager, device, ASSEMBLE_TEMPLATE)?;
        let blur_module = compile(shader_manager, device, BLUR_TEMPLATE)?;

        let d2 = wgpu::TextureViewDimension::D2;
        let d2_array = wgpu::TextureViewDimension::D2Array;

        let layouts = Layouts {
            deinterleave: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("DAO Deinterleave Layout"),
                entries: &[
                    uniform_entry(0),
                    texture_entry(1, d2),
                    texture_entry(2, d2),
                    storage_texture_entry(3, SLICE_VOLUME_FORMAT, d2_array),
                ],
            }),
            evaluate: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("DAO Evaluate Layout"),
                entries: &[
                    uniform_entry(0),
                    texture_entry(1, d2_array),
                    storage_buffer_entry(2, false),
                ],
            }),
            assemble: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("DAO Assemble Layout"),
                entries: &[
                    uniform_entry(0),
                    storage_buffer_entry(1, true),
                    storage_texture_entry(2, OBSCURANCE_FORMAT, d2),
                ],
            }),
            blur: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("DAO Blur Layout"),
                entries: &[
                    uniform_entry(0),
                    texture_entry(1, d2),
                    texture_entry(2, d2),
                    storage_texture_entry(3, OBSCURANCE_FORMAT, d2),
                ],
            }),
        };

        let pipelines = Pipelines {
            deinterleave: create_pipeline(
                device,
                "DAO Deinterleave Pipeline",
                &layouts.deinterleave,
                &deinterleave_module,
                "main",
            ),
            evaluate_x: create_pipeline(
                device,
                "DAO Evaluate X Pipeline",
                &layouts.evaluate,
                &evaluate_module,
                "evaluate_x",
            ),
            evaluate_y: create_pipeline(
                device,
                "DAO Evaluate Y Pipeline",
                &layouts.evaluate,
                &evaluate_module,
                "evaluate_y",
            ),
            assemble: create_pipeline(
                device,
                "DAO Assemble Pipeline",
                &layouts.assemble,
                &assemble_module,
                "main",
            ),
            blur_x: create_pipeline(
                device,
                "DAO Blur X Pipeline",
                &layouts.blur,
                &blur_module,
                "blur_x",
            ),
            blur_y: create_pipeline(
                device,
                "DAO Blur Y Pipeline",
                &layouts.blur,
                &blur_module,
                "blur_y",
            ),
        };

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("DAO Uniforms"),
            size: size_of::<DaoUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let samples = SampleSetGenerator::new(grouping).generate(seed);
        log::debug!("Created DAO pass ({grouping:?} grouping, seed {seed})");

        Ok(Self {
            samples,
            gbuffer,
            pipelines,
            layouts,
            uniform_buffer,
            uploaded: None,
            frame: None,
            last_error: None,
        })
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Transient id of the final obscurance texture of the current frame.
    ///
    /// `None` if the frame was skipped or not prepared yet.
    #[inline]
    #[must_use]
    pub fn output_id(&self) -> Option<TransientId> {
        self.frame.as_ref().map(|f| f.output)
    }

    /// Error that made the last `prepare` skip its frame, if any.
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&DaoError> {
        self.last_error.as_ref()
    }

    fn validate_frame(ctx: &PrepareContext) -> Result<(u32, u32)> {
        let depth = ctx.inputs.depth;
        let normals = ctx.inputs.normals;
        let size = (depth.width(), depth.height());
        check_resolution(size.0, size.1)?;

        let normal_size = (normals.width(), normals.height());
        if normal_size != size {
            return Err(DaoError::ResolutionMismatch {
                what: "normal buffer",
                expected: size,
                actual: normal_size,
            });
        }
        if ctx.inputs.camera.size() != size {
            return Err(DaoError::ResolutionMismatch {
                what: "camera target",
                expected: size,
                actual: ctx.inputs.camera.size(),
            });
        }
        Ok(size)
    }

    fn upload_uniforms(&mut self, ctx: &PrepareContext) {
        let uniforms = DaoUniforms::build(
            ctx.inputs.params,
            ctx.inputs.camera,
            &self.samples,
            &self.gbuffer,
        );
        if self.uploaded.as_ref() == Some(&uniforms) {
            return;
        }
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        log::trace!(
            "DAO uniforms uploaded (params v{})",
            ctx.inputs.params.version()
        );
        self.uploaded = Some(uniforms);
    }

    fn uniform_binding(&self) -> wgpu::BindGroupEntry<'_> {
        wgpu::BindGroupEntry {
            binding: 0,
            resource: self.uniform_buffer.as_entire_binding(),
        }
    }

    fn build_frame(&self, ctx: &mut PrepareContext, size: (u32, u32)) -> FrameBindings {
        let device = ctx.device;
        let (width, height) = size;
        let (half_width, half_height) = (width / 2, height / 2);

        let depth_view = ctx
            .inputs
            .depth
            .create_view(&wgpu::TextureViewDescriptor::default());
        let normal_view = ctx
            .inputs
            .normals
            .create_view(&wgpu::TextureViewDescriptor::default());

        let obscurance_desc = |label| TransientTextureDesc {
            width,
            height,
            array_layers: 1,
            format: OBSCURANCE_FORMAT,
            usage: OBSCURANCE_USAGE,
            label,
        };

        // =====================================================================
        // Deinterleave + Evaluate
        // =====================================================================
        let slices = ctx.transient_pool.allocate_texture(
            device,
            &TransientTextureDesc {
                width: half_width,
                height: half_height,
                array_layers: SLICE_COUNT as u32,
                format: SLICE_VOLUME_FORMAT,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                label: "DAO Depth/Normal Slices",
            },
        );
        let raw_planes = (SLICE_COUNT * Axis::ALL.len()) as u64;
        let raw = ctx.transient_pool.allocate_buffer(
            device,
            &TransientBufferDesc {
                size: raw_planes * u64::from(half_width) * u64::from(half_height) * 4,
                usage: wgpu::BufferUsages::STORAGE,
                label: "DAO Raw Obscurance",
            },
        );

        let pool: &TransientPool = &*ctx.transient_pool;
        let deinterleave = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("DAO Deinterleave BindGroup"),
            layout: &self.layouts.deinterleave,
            entries: &[
                self.uniform_binding(),
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(pool.get_view(slices)),
                },
            ],
        });
        let evaluate = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("DAO Evaluate BindGroup"),
            layout: &self.layouts.evaluate,
            entries: &[
                self.uniform_binding(),
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(pool.get_view(slices)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: pool.get_buffer(raw).as_entire_binding(),
                },
            ],
        });
        ctx.transient_pool.release(slices);

        // =====================================================================
        // Assemble
        // =====================================================================
        let assembled = ctx
            .transient_pool
            .allocate_texture(device, &obscurance_desc("DAO Assembled"));
        let pool: &TransientPool = &*ctx.transient_pool;
        let assemble = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("DAO Assemble BindGroup"),
            layout: &self.layouts.assemble,
            entries: &[
                self.uniform_binding(),
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: pool.get_buffer(raw).as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(pool.get_view(assembled)),
                },
            ],
        });
        ctx.transient_pool.release(raw);

        // =====================================================================
        // Blur X / Blur Y
        // =====================================================================
        let blurred_x = ctx
            .transient_pool
            .allocate_texture(device, &obscurance_desc("DAO Blur X"));
        let blur_x = self.blur_bind_group(
            device,
            &*ctx.transient_pool,
            "DAO Blur X BindGroup",
            assembled,
            &depth_view,
            blurred_x,
        );
        ctx.transient_pool.release(assembled);

        let output = ctx
            .transient_pool
            .allocate_texture(device, &obscurance_desc("DAO Filtered Obscurance"));
        let blur_y = self.blur_bind_group(
            device,
            &*ctx.transient_pool,
            "DAO Blur Y BindGroup",
            blurred_x,
            &depth_view,
            output,
        );
        ctx.transient_pool.release(blurred_x);

        let sink = ctx.inputs.params.output_sink();
        ctx.blackboard.publish(sink.slot(), output);

        let half_groups = crate::compute::workgroup_count(half_width, half_height);
        let full_groups = crate::compute::workgroup_count(width, height);

        FrameBindings {
            deinterleave,
            evaluate,
            assemble,
            blur_x,
            blur_y,
            half_groups,
            full_groups,
            output,
            sink,
        }
    }

    fn blur_bind_group(
        &self,
        device: &wgpu::Device,
        pool: &TransientPool,
        label: &str,
        input: TransientId,
        depth_view: &wgpu::TextureView,
        output: TransientId,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layouts.blur,
            entries: &[
                self.uniform_binding(),
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(pool.get_view(input)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(pool.get_view(output)),
                },
            ],
        })
    }
}

impl RenderNode for DaoPass {
    fn name(&self) -> &'static str {
        "DAO Pass"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext) {
        self.frame = None;

        let size = match Self::validate_frame(ctx) {
            Ok(size) => size,
            Err(err) => {
                if self.last_error.as_ref() != Some(&err) {
                    log::warn!("Skipping ambient obscurance: {err}");
                }
                self.last_error = Some(err);
                return;
            }
        };
        if self.last_error.take().is_some() {
            log::debug!("Ambient obscurance resumed at {}x{}", size.0, size.1);
        }

        self.upload_uniforms(ctx);
        self.frame = Some(self.build_frame(ctx, size));
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let Some(frame) = &self.frame else {
            return;
        };
        // The host aborted the frame after prepare.
        if ctx.blackboard.get(frame.sink.slot()) != Some(frame.output) {
            log::warn!("DAO output slot was cleared before execution; skipping");
            return;
        }

        let (hx, hy) = frame.half_groups;
        let (fx, fy) = frame.full_groups;

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("DAO Deinterleave"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.deinterleave);
            pass.set_bind_group(0, &frame.deinterleave, &[]);
            pass.dispatch_workgroups(hx, hy, SLICE_COUNT as u32);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("DAO Evaluate"),
                timestamp_writes: None,
            });
            pass.set_bind_group(0, &frame.evaluate, &[]);
            pass.set_pipeline(&self.pipelines.evaluate_x);
            pass.dispatch_workgroups(hx, hy, SLICE_COUNT as u32);
            pass.set_pipeline(&self.pipelines.evaluate_y);
            pass.dispatch_workgroups(hx, hy, SLICE_COUNT as u32);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("DAO Assemble"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.assemble);
            pass.set_bind_group(0, &frame.assemble, &[]);
            pass.dispatch_workgroups(fx, fy, 1);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("DAO Blur X"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.blur_x);
            pass.set_bind_group(0, &frame.blur_x, &[]);
            pass.dispatch_workgroups(fx, fy, 1);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("DAO Blur Y"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.blur_y);
            pass.set_bind_group(0, &frame.blur_y, &[]);
            pass.dispatch_workgroups(fx, fy, 1);
        }
    }
}
