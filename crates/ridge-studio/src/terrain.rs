use anyhow::{Context, Result};

use ridge_engine::camera::CameraParams;
use ridge_engine::core::{App, AppControl, FrameCtx, InitCtx};
use ridge_engine::coords::Viewport;
use ridge_engine::frame_loop::{LoopConfig, RenderLoop};
use ridge_engine::geometry::{Geometry, GeometryMode};
use ridge_engine::paint::Color;
use ridge_engine::render::{self, BufferSet, GpuProgram, VertexInput, VertexPointer};
use ridge_engine::shader::{self, ProgramLocations};

pub(crate) const VERTEX_SHADER: &str = include_str!("../shaders/terrain.vert.wgsl");
pub(crate) const FRAGMENT_SHADER: &str = include_str!("../shaders/terrain.frag.wgsl");

/// What the terrain scene draws and how it animates.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Points per strip.
    pub grid_width: u32,
    /// Number of strips.
    pub grid_height: u32,
    pub geometry: GeometryMode,
    /// Shader time per millisecond of frame time.
    pub time_scale: f64,
    pub clear: Color,
    pub camera: CameraParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid_width: 512,
            grid_height: 128,
            geometry: GeometryMode::default(),
            time_scale: 0.1,
            clear: Color::BLACK,
            camera: CameraParams::default(),
        }
    }
}

impl TerrainConfig {
    fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            camera: self.camera,
            clear: self.clear,
            time_scale: self.time_scale,
            ..LoopConfig::default()
        }
    }
}

struct TerrainScene {
    program: GpuProgram,
    buffers: BufferSet,
    render_loop: RenderLoop,
}

/// Compiles the terrain shaders, uploads the grid and runs the loop.
pub(crate) struct TerrainApp {
    config: TerrainConfig,
    scene: Option<TerrainScene>,
}

impl TerrainApp {
    pub(crate) fn new(config: TerrainConfig) -> Self {
        Self { config, scene: None }
    }
}

/// Links the bundled shaders and reflects their bindings.
pub(crate) fn load_program() -> Result<(shader::Program, ProgramLocations)> {
    let program = shader::compile_and_link(VERTEX_SHADER, FRAGMENT_SHADER)
        .context("terrain shaders failed to build")?;
    let locations = shader::reflect(&program);
    log::debug!(
        "attributes: {:?}, uniforms: {:?}",
        locations.attributes.names().collect::<Vec<_>>(),
        locations.uniforms.names().collect::<Vec<_>>()
    );
    Ok((program, locations))
}

impl App for TerrainApp {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        let (program, locations) = load_program()?;
        log::info!("terrain program linked");

        let geometry = Geometry::build(
            self.config.geometry,
            self.config.grid_width,
            self.config.grid_height,
        );
        let buffers = BufferSet::upload(ctx.gpu.device(), &geometry)?;

        let loop_config = self.config.loop_config();
        let position = locations
            .attributes
            .require(&loop_config.position_attribute)?
            .location;
        let inputs = [VertexInput {
            attribute: position,
            pointer: VertexPointer::float3(),
        }];
        let gpu_program = GpuProgram::new(
            &ctx.render_ctx(),
            &program,
            &locations,
            &inputs,
            geometry.draw_mode(),
        )?;

        let mut render_loop =
            RenderLoop::new(&locations, buffers.batches(), geometry.draw_mode(), loop_config)?;
        render_loop.start(ctx.runtime);

        self.scene = Some(TerrainScene {
            program: gpu_program,
            buffers,
            render_loop,
        });
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) {
        log::debug!("viewport now {}x{}", viewport.width, viewport.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(TerrainScene {
            program,
            buffers,
            render_loop,
        }) = self.scene.as_mut()
        else {
            return AppControl::Continue;
        };

        let Some(commands) = render_loop.frame(ctx.time.elapsed_ms, ctx.viewport, ctx.runtime)
        else {
            return AppControl::Continue;
        };

        let control = ctx.render(|rctx, target| {
            render::execute(commands, rctx, target, program, buffers)
        });

        if control == AppControl::Exit {
            render_loop.cancel();
        }
        control
    }
}
