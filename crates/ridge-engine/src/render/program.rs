use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use crate::shader::{AttributeLocation, Program, ProgramLocations, UniformLocation};

use super::{DrawMode, RenderCtx, UniformValue, VertexPointer};

/// Bind group every uniform of a program must live in.
const UNIFORM_GROUP: u32 = 0;

/// One vertex attribute fed from its own buffer slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexInput {
    pub attribute: AttributeLocation,
    pub pointer: VertexPointer,
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    size: u64,
}

/// A linked [`Program`] realized as a wgpu render pipeline.
///
/// Owns one uniform buffer per active uniform plus the bind group over them.
/// Vertex inputs are bound one buffer per slot, in the order given to
/// [`GpuProgram::new`].
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: HashMap<UniformLocation, UniformSlot>,
    vertex_slots: HashMap<AttributeLocation, u32>,
    draw_mode: DrawMode,
}

impl GpuProgram {
    pub fn new(
        ctx: &RenderCtx<'_>,
        program: &Program,
        locations: &ProgramLocations,
        inputs: &[VertexInput],
        draw_mode: DrawMode,
    ) -> Result<Self> {
        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ridge vertex shader"),
            source: wgpu::ShaderSource::Wgsl(program.vertex().source().into()),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ridge fragment shader"),
            source: wgpu::ShaderSource::Wgsl(program.fragment().source().into()),
        });

        // Uniforms: one buffer each, all in group 0.
        let mut layout_entries = Vec::with_capacity(locations.uniforms.len());
        let mut uniforms = HashMap::with_capacity(locations.uniforms.len());
        for u in locations.uniforms.iter() {
            if u.location.group != UNIFORM_GROUP {
                bail!(
                    "uniform `{}` is in group {}; only group {UNIFORM_GROUP} is supported",
                    u.name,
                    u.location.group
                );
            }
            let size = uniform_buffer_size(u.byte_size);
            let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("ridge uniform {}", u.name)),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            layout_entries.push(wgpu::BindGroupLayoutEntry {
                binding: u.location.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
            uniforms.insert(u.location, UniformSlot { buffer, size });
        }

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("ridge program bgl"),
                    entries: &layout_entries,
                });

        let bind_entries: Vec<wgpu::BindGroupEntry<'_>> = uniforms
            .iter()
            .map(|(loc, slot)| wgpu::BindGroupEntry {
                binding: loc.binding,
                resource: slot.buffer.as_entire_binding(),
            })
            .collect();
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ridge program bind group"),
            layout: &bind_group_layout,
            entries: &bind_entries,
        });

        // Vertex inputs: slot i reads attribute inputs[i].
        let mut attributes = Vec::with_capacity(inputs.len());
        let mut vertex_slots = HashMap::with_capacity(inputs.len());
        for (slot, input) in inputs.iter().enumerate() {
            let info = locations
                .attributes
                .iter()
                .find(|a| a.location == input.attribute)
                .with_context(|| {
                    format!("no active attribute at location {}", input.attribute.0)
                })?;
            let format = input.pointer.format().with_context(|| {
                format!("unsupported vertex pointer for attribute `{}`", info.name)
            })?;
            if info.element_type.float_components() != Some(input.pointer.components) {
                bail!(
                    "attribute `{}` is {:?} but the pointer supplies {} component(s)",
                    info.name,
                    info.element_type,
                    input.pointer.components
                );
            }
            attributes.push([wgpu::VertexAttribute {
                format,
                offset: u64::from(input.pointer.offset),
                shader_location: input.attribute.0,
            }]);
            vertex_slots.insert(input.attribute, slot as u32);
        }
        let vertex_layouts: Vec<wgpu::VertexBufferLayout<'_>> = inputs
            .iter()
            .zip(&attributes)
            .map(|(input, attrs)| wgpu::VertexBufferLayout {
                array_stride: u64::from(input.pointer.effective_stride()),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("ridge program pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ridge program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(program.vertex().entry_point()),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(program.fragment().entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: draw_mode.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "program pipeline built: {} uniform(s), {} vertex input(s), {:?}",
            uniforms.len(),
            vertex_slots.len(),
            draw_mode
        );

        Ok(Self {
            pipeline,
            bind_group,
            uniforms,
            vertex_slots,
            draw_mode,
        })
    }

    /// Writes `value` into the uniform buffer at `location`.
    pub fn write_uniform(
        &self,
        queue: &wgpu::Queue,
        location: UniformLocation,
        value: &UniformValue,
    ) -> Result<()> {
        let slot = self.uniforms.get(&location).with_context(|| {
            format!(
                "no uniform at group {} binding {}",
                location.group, location.binding
            )
        })?;
        let bytes = value.as_bytes();
        if bytes.len() as u64 > slot.size {
            bail!(
                "uniform value of {} bytes does not fit binding {} ({} bytes)",
                bytes.len(),
                location.binding,
                slot.size
            );
        }
        queue.write_buffer(&slot.buffer, 0, bytes);
        Ok(())
    }

    /// Vertex buffer slot that feeds `attribute`.
    #[inline]
    pub fn vertex_slot(&self, attribute: AttributeLocation) -> Option<u32> {
        self.vertex_slots.get(&attribute).copied()
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Uniform buffers are sized to a 16-byte multiple, never empty.
fn uniform_buffer_size(byte_size: u32) -> u64 {
    let aligned = (u64::from(byte_size) + 15) & !15;
    aligned.max(16)
}
