//! Render-target sizing.

mod manager;

pub use manager::{SurfaceChange, SurfaceManager};
