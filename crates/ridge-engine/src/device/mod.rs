//! GPU device and surface ownership.
//!
//! [`Gpu`] creates the wgpu instance, adapter, device and queue, configures
//! the window surface, and hands out one [`GpuFrame`] per rendered frame.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
