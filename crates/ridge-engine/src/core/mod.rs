//! Contract between the runtime and the application.
//!
//! The runtime owns the window, device and surface sizing; the application
//! sees them only through [`InitCtx`] and [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx, WindowCtx};
