use anyhow::Result;
use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::geometry::Geometry;

use super::BufferId;

/// What a buffer is bound as.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BufferTarget {
    #[default]
    Vertex,
    Index,
    Uniform,
}

/// Update-frequency hint.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once at creation, drawn many times.
    #[default]
    StaticDraw,
    /// May be rewritten through the queue after creation.
    DynamicDraw,
}

fn wgpu_usages(target: BufferTarget, usage: BufferUsage) -> wgpu::BufferUsages {
    let base = match target {
        BufferTarget::Vertex => wgpu::BufferUsages::VERTEX,
        BufferTarget::Index => wgpu::BufferUsages::INDEX,
        BufferTarget::Uniform => wgpu::BufferUsages::UNIFORM,
    };
    match usage {
        BufferUsage::StaticDraw => base,
        BufferUsage::DynamicDraw => base | wgpu::BufferUsages::COPY_DST,
    }
}

/// One device buffer with its contents uploaded.
///
/// Released when dropped.
#[derive(Debug)]
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    element_count: u32,
    target: BufferTarget,
    usage: BufferUsage,
}

impl GpuBuffer {
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of host elements uploaded (vertices for vertex buffers).
    #[inline]
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    #[inline]
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

/// Uploads `data` into a new device buffer.
///
/// One buffer per call. Empty data is rejected.
pub fn upload_buffer<T: Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
    target: BufferTarget,
    usage: BufferUsage,
) -> Result<GpuBuffer> {
    anyhow::ensure!(!data.is_empty(), "buffer `{label}` has no data to upload");
    let element_count =
        u32::try_from(data.len()).map_err(|_| anyhow::anyhow!("buffer `{label}` is too large"))?;

    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu_usages(target, usage),
    });

    Ok(GpuBuffer {
        buffer,
        element_count,
        target,
        usage,
    })
}

/// Uploads a vertex array with the default target and usage.
pub fn upload_vertices<T: Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> Result<GpuBuffer> {
    upload_buffer(device, label, data, BufferTarget::default(), BufferUsage::default())
}

/// One draw: a buffer and how many vertices to read from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub buffer: BufferId,
    pub vertex_count: u32,
}

/// Static vertex buffers for a [`Geometry`], in creation order.
#[derive(Debug, Default)]
pub struct BufferSet {
    buffers: Vec<GpuBuffer>,
}

impl BufferSet {
    /// Uploads every batch of `geometry` as its own static buffer.
    pub fn upload(device: &wgpu::Device, geometry: &Geometry) -> Result<Self> {
        let buffers = geometry
            .batches()
            .into_iter()
            .enumerate()
            .map(|(i, batch)| upload_vertices(device, &format!("ridge grid batch {i}"), batch))
            .collect::<Result<Vec<_>>>()?;

        log::info!("uploaded {} static vertex buffer(s)", buffers.len());
        Ok(Self { buffers })
    }

    #[inline]
    pub fn get(&self, id: BufferId) -> Option<&GpuBuffer> {
        self.buffers.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Draw batches in creation order.
    pub fn batches(&self) -> Vec<DrawBatch> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(i, b)| DrawBatch {
                buffer: BufferId(i),
                vertex_count: b.element_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_static_vertex() {
        assert_eq!(BufferTarget::default(), BufferTarget::Vertex);
        assert_eq!(BufferUsage::default(), BufferUsage::StaticDraw);
        assert_eq!(
            wgpu_usages(BufferTarget::default(), BufferUsage::default()),
            wgpu::BufferUsages::VERTEX
        );
    }

    #[test]
    fn dynamic_usage_allows_rewrites() {
        let usages = wgpu_usages(BufferTarget::Uniform, BufferUsage::DynamicDraw);
        assert!(usages.contains(wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST));
    }
}
