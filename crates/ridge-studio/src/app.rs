use anyhow::{ensure, Result};
use winit::dpi::LogicalSize;

use ridge_engine::device::GpuInit;
use ridge_engine::geometry::GeometryMode;
use ridge_engine::logging::{init_logging, LoggingConfig};
use ridge_engine::window::{Runtime, RuntimeConfig};

use crate::terrain::{TerrainApp, TerrainConfig};

/// Builder for the terrain viewer.
///
/// ```rust,ignore
/// Application::new()
///     .title("Ridge")
///     .grid(512, 128)
///     .run()?;
/// ```
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    terrain: TerrainConfig,
    gpu: GpuInit,
    logging: LoggingConfig,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title: "ridge".to_string(),
            width: 1280.0,
            height: 720.0,
            terrain: TerrainConfig::default(),
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Points per strip and strip count.
    pub fn grid(mut self, width: u32, height: u32) -> Self {
        self.terrain.grid_width = width;
        self.terrain.grid_height = height;
        self
    }

    pub fn geometry(mut self, mode: GeometryMode) -> Self {
        self.terrain.geometry = mode;
        self
    }

    pub fn time_scale(mut self, scale: f64) -> Self {
        self.terrain.time_scale = scale;
        self
    }

    /// Opens the window and blocks until it closes.
    pub fn run(self) -> Result<()> {
        init_logging(self.logging);
        ensure!(
            self.terrain.grid_width > 0 && self.terrain.grid_height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.terrain.grid_width,
            self.terrain.grid_height
        );

        log::info!(
            "starting {} with a {}x{} {:?} grid",
            self.title,
            self.terrain.grid_width,
            self.terrain.grid_height,
            self.terrain.geometry
        );

        let config = RuntimeConfig {
            title: self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };
        Runtime::run(config, self.gpu, TerrainApp::new(self.terrain))
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let app = Application::new()
            .title("terrain")
            .size(640.0, 480.0)
            .grid(64, 16)
            .geometry(GeometryMode::DenseMesh)
            .time_scale(0.2);
        assert_eq!(app.title, "terrain");
        assert_eq!((app.width, app.height), (640.0, 480.0));
        assert_eq!((app.terrain.grid_width, app.terrain.grid_height), (64, 16));
        assert_eq!(app.terrain.geometry, GeometryMode::DenseMesh);
        assert_eq!(app.terrain.time_scale, 0.2);
    }

    #[test]
    fn empty_grid_is_rejected_before_opening_a_window() {
        let err = Application::new().grid(0, 128).run().unwrap_err();
        assert!(err.to_string().contains("0x128"));
    }
}
