mod app;
mod terrain;

use ridge_engine::geometry::GeometryMode;

use app::Application;

fn main() -> anyhow::Result<()> {
    Application::new()
        .title("Ridge")
        .size(1280.0, 720.0)
        .grid(512, 128)
        .geometry(GeometryMode::LineStrips)
        .time_scale(0.1)
        .run()
}
