use glam::{Mat4, Vec3};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::shader::{AttributeLocation, UniformLocation};

/// Primitive assembly for a draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawMode {
    /// Connected segments between consecutive vertices.
    LineStrip,
    Points,
}

impl DrawMode {
    pub(crate) fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Self::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Self::Points => wgpu::PrimitiveTopology::PointList,
        }
    }
}

/// Handle to a buffer in a [`BufferSet`](super::BufferSet), in creation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// Scalar type of a vertex attribute component.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComponentType {
    Float32,
}

impl ComponentType {
    #[inline]
    pub const fn byte_size(self) -> u32 {
        match self {
            Self::Float32 => 4,
        }
    }
}

/// How an attribute reads from its bound buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexPointer {
    pub components: u8,
    pub component_type: ComponentType,
    /// Bytes between consecutive vertices; `0` means tightly packed.
    pub stride: u32,
    pub offset: u32,
}

impl VertexPointer {
    /// Three tightly packed `f32`s.
    pub const fn float3() -> Self {
        Self {
            components: 3,
            component_type: ComponentType::Float32,
            stride: 0,
            offset: 0,
        }
    }

    /// Stride with the tightly-packed default resolved.
    pub fn effective_stride(self) -> u32 {
        if self.stride == 0 {
            self.components as u32 * self.component_type.byte_size()
        } else {
            self.stride
        }
    }

    pub(crate) fn format(self) -> Option<wgpu::VertexFormat> {
        match (self.component_type, self.components) {
            (ComponentType::Float32, 1) => Some(wgpu::VertexFormat::Float32),
            (ComponentType::Float32, 2) => Some(wgpu::VertexFormat::Float32x2),
            (ComponentType::Float32, 3) => Some(wgpu::VertexFormat::Float32x3),
            (ComponentType::Float32, 4) => Some(wgpu::VertexFormat::Float32x4),
            _ => None,
        }
    }
}

/// A value written to a uniform slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Raw bytes in the shader's layout (column-major for matrices).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Float(v) => bytemuck::bytes_of(v),
            Self::Vec3(v) => bytemuck::bytes_of(v),
            Self::Mat4(m) => bytemuck::bytes_of(m),
        }
    }
}

/// Backend-neutral per-frame command.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    SetViewport(Viewport),
    Clear(Color),
    UseProgram,
    SetUniform {
        location: UniformLocation,
        value: UniformValue,
    },
    BindVertexBuffer {
        buffer: BufferId,
        attribute: AttributeLocation,
        pointer: VertexPointer,
    },
    Draw {
        mode: DrawMode,
        first: u32,
        count: u32,
    },
}

/// Recorded command stream for one frame.
///
/// `clear()` keeps the allocation, so steady-state recording does not allocate.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<FrameCommand>,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: FrameCommand) {
        self.commands.push(cmd);
    }

    #[inline]
    pub fn commands(&self) -> &[FrameCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Buffers in the order they are bound.
    pub fn bound_buffers(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.commands.iter().filter_map(|c| match c {
            FrameCommand::BindVertexBuffer { buffer, .. } => Some(*buffer),
            _ => None,
        })
    }

    /// Number of draw commands recorded.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, FrameCommand::Draw { .. }))
            .count()
    }

    /// Last value recorded for `location`, if any.
    pub fn uniform(&self, location: UniformLocation) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            FrameCommand::SetUniform { location: l, value } if *l == location => Some(*value),
            _ => None,
        })
    }
}
