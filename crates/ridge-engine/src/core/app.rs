use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::Viewport;

use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives.
///
/// Frames are not continuous: the runtime only redraws when the app asks for
/// one through [`RuntimeCtx::request_redraw`](crate::window::RuntimeCtx::request_redraw)
/// or after a resize.
pub trait App {
    /// Called once the window and device exist, before the first frame.
    ///
    /// An error aborts the run.
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()>;

    /// Called after the render target changed size. `viewport` may be zero-sized.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
