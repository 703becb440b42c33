//! Per-frame animation loop.
//!
//! [`RenderLoop`] owns the transform scratch state and records each frame as
//! a [`CommandList`](crate::render::CommandList). Scheduling goes through a
//! [`FrameScheduler`] so the loop runs without a window in tests.

mod cancellation;
mod render_loop;

pub use cancellation::CancellationToken;
pub use render_loop::{FrameScheduler, LoopConfig, LoopState, RenderLoop};
