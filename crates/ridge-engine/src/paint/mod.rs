//! Color model used for render-target clears.

mod color;

pub use color::Color;
