//! Camera and per-frame transform composition.

mod transform;

pub use transform::{CameraDrift, CameraParams, TransformState};
