//! Coordinate types shared by the surface, camera and frame loop.
//!
//! Sizes are physical pixels; the swapchain is configured in the same unit.

mod viewport;

pub use viewport::Viewport;
