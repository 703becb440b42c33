//! Window and event loop.
//!
//! Owns the `winit` event loop and the single window, and wires them to the
//! GPU layer, the surface manager and the application callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
