use crate::coords::Viewport;

/// What a resize notification did to the render target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceChange {
    /// Same size as before; nothing to reconfigure.
    Unchanged,
    /// New non-zero size; the swapchain should be reconfigured to it.
    Resized(Viewport),
    /// Zero-area client (minimized). Recorded, but the swapchain keeps its
    /// last configuration and frames are skipped.
    Suspended(Viewport),
}

/// Sole owner of the render-target [`Viewport`].
///
/// Sizing is applied eagerly on construction, then on every resize
/// notification, always to the surface's client size in physical pixels.
#[derive(Debug, Clone)]
pub struct SurfaceManager {
    viewport: Viewport,
}

impl SurfaceManager {
    pub fn new(client_size: impl Into<Viewport>) -> Self {
        let viewport = client_size.into();
        log::debug!("surface sized to {}x{}", viewport.width, viewport.height);
        Self { viewport }
    }

    pub fn on_resize(&mut self, client_size: impl Into<Viewport>) -> SurfaceChange {
        let next = client_size.into();
        if next == self.viewport {
            return SurfaceChange::Unchanged;
        }
        self.viewport = next;

        if next.is_valid() {
            log::debug!("surface resized to {}x{}", next.width, next.height);
            SurfaceChange::Resized(next)
        } else {
            log::debug!("surface has zero area ({}x{}); rendering paused", next.width, next.height);
            SurfaceChange::Suspended(next)
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether frames can be rendered at the current size.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.viewport.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_applies_size_eagerly() {
        let sm = SurfaceManager::new(Viewport::new(1280, 720));
        assert_eq!(sm.viewport(), Viewport::new(1280, 720));
        assert!(sm.is_renderable());
    }

    #[test]
    fn resize_updates_viewport() {
        let mut sm = SurfaceManager::new(Viewport::new(800, 600));
        assert_eq!(
            sm.on_resize(Viewport::new(1024, 768)),
            SurfaceChange::Resized(Viewport::new(1024, 768))
        );
        assert_eq!(sm.viewport(), Viewport::new(1024, 768));
    }

    #[test]
    fn same_size_is_unchanged() {
        let mut sm = SurfaceManager::new(Viewport::new(800, 600));
        assert_eq!(sm.on_resize(Viewport::new(800, 600)), SurfaceChange::Unchanged);
    }

    #[test]
    fn zero_size_is_recorded_but_suspends() {
        let mut sm = SurfaceManager::new(Viewport::new(800, 600));
        assert_eq!(
            sm.on_resize(Viewport::new(0, 0)),
            SurfaceChange::Suspended(Viewport::new(0, 0))
        );
        assert_eq!(sm.viewport(), Viewport::new(0, 0));
        assert!(!sm.is_renderable());

        assert_eq!(
            sm.on_resize(Viewport::new(800, 600)),
            SurfaceChange::Resized(Viewport::new(800, 600))
        );
    }

    #[test]
    fn accepts_physical_sizes() {
        let mut sm = SurfaceManager::new(winit::dpi::PhysicalSize::new(640u32, 480u32));
        assert_eq!(
            sm.on_resize(winit::dpi::PhysicalSize::new(640u32, 0u32)),
            SurfaceChange::Suspended(Viewport::new(640, 0))
        );
    }
}
