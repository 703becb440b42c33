//! Ridge engine crate.
//!
//! Shader compile/link/reflect, terrain geometry, the per-frame transform and
//! render loop, and the winit + wgpu runtime that drives them.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;

pub mod shader;
pub mod geometry;
pub mod camera;
pub mod render;
pub mod frame_loop;
pub mod surface;
