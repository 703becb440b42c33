//! GPU side of the renderer.
//!
//! The frame loop records backend-neutral [`FrameCommand`]s into a
//! [`CommandList`]; [`execute`] replays them against a [`GpuProgram`] and the
//! static vertex buffers of a [`BufferSet`].
//!
//! Convention:
//! - vertex data is uploaded once and never rewritten
//! - uniforms live in bind group 0, one buffer per uniform

mod buffer;
mod commands;
mod ctx;
mod executor;
mod program;

pub use buffer::{
    upload_buffer, upload_vertices, BufferSet, BufferTarget, BufferUsage, DrawBatch, GpuBuffer,
};
pub use commands::{
    BufferId, CommandList, ComponentType, DrawMode, FrameCommand, UniformValue, VertexPointer,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use executor::execute;
pub use program::{GpuProgram, VertexInput};
