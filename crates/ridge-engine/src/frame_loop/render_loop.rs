use crate::camera::{CameraParams, TransformState};
use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{
    CommandList, DrawBatch, DrawMode, FrameCommand, UniformValue, VertexPointer,
};
use crate::shader::{AttributeLocation, MissingBindingError, ProgramLocations, UniformLocation};

use super::CancellationToken;

/// Something that can schedule one more frame callback.
///
/// The runtime implements this with a window redraw request.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    /// Terminal.
    Cancelled,
}

/// Names and constants the loop binds against.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub camera: CameraParams,
    pub clear: Color,
    /// `u_time = frame_time * time_scale`.
    pub time_scale: f64,
    pub position_attribute: String,
    pub time_uniform: String,
    pub mvp_uniform: String,
    pub pointer: VertexPointer,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            camera: CameraParams::default(),
            clear: Color::BLACK,
            time_scale: 0.1,
            position_attribute: "a_position".to_owned(),
            time_uniform: "u_time".to_owned(),
            mvp_uniform: "u_modelViewProjection".to_owned(),
            pointer: VertexPointer::float3(),
        }
    }
}

/// Bindings resolved once at construction.
#[derive(Debug, Copy, Clone)]
struct ResolvedBindings {
    position: AttributeLocation,
    time: UniformLocation,
    mvp: UniformLocation,
}

/// Records one frame of terrain drawing per call to [`RenderLoop::frame`].
///
/// The same batches are drawn in the same order every frame; only the two
/// uniforms change.
pub struct RenderLoop {
    state: LoopState,
    token: CancellationToken,
    config: LoopConfig,
    bindings: ResolvedBindings,
    batches: Vec<DrawBatch>,
    draw_mode: DrawMode,
    transform: TransformState,
    commands: CommandList,
}

impl RenderLoop {
    /// Resolves the configured binding names against `locations`.
    pub fn new(
        locations: &ProgramLocations,
        batches: Vec<DrawBatch>,
        draw_mode: DrawMode,
        config: LoopConfig,
    ) -> Result<Self, MissingBindingError> {
        let bindings = ResolvedBindings {
            position: locations.attributes.require(&config.position_attribute)?.location,
            time: locations.uniforms.require(&config.time_uniform)?.location,
            mvp: locations.uniforms.require(&config.mvp_uniform)?.location,
        };
        log::debug!(
            "render loop bound: {} at {:?}, {} at {:?}, {} at {:?}",
            config.position_attribute,
            bindings.position,
            config.time_uniform,
            bindings.time,
            config.mvp_uniform,
            bindings.mvp
        );

        Ok(Self {
            state: LoopState::Idle,
            token: CancellationToken::new(),
            config,
            bindings,
            batches,
            draw_mode,
            transform: TransformState::new(),
            commands: CommandList::new(),
        })
    }

    /// Idle → Running, scheduling the first frame. Returns whether it started.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.token.is_cancelled() {
            self.state = LoopState::Cancelled;
        }
        if self.state != LoopState::Idle {
            return false;
        }
        self.state = LoopState::Running;
        log::info!("render loop started with {} batch(es)", self.batches.len());
        scheduler.request_frame();
        true
    }

    /// Records one frame and schedules the next.
    ///
    /// Returns `None` when the loop is not running; nothing is recorded or
    /// scheduled then.
    pub fn frame<S: FrameScheduler + ?Sized>(
        &mut self,
        frame_time: f64,
        viewport: Viewport,
        scheduler: &mut S,
    ) -> Option<&CommandList> {
        if self.token.is_cancelled() {
            self.state = LoopState::Cancelled;
        }
        if self.state != LoopState::Running {
            return None;
        }

        self.transform.update(frame_time, viewport, &self.config.camera);
        self.record(frame_time, viewport);
        log::trace!(
            "frame at {frame_time:.1}ms: {} command(s), {:?}",
            self.commands.len(),
            viewport
        );

        scheduler.request_frame();
        Some(&self.commands)
    }

    fn record(&mut self, frame_time: f64, viewport: Viewport) {
        let b = self.bindings;
        let cmds = &mut self.commands;
        cmds.clear();

        cmds.push(FrameCommand::SetViewport(viewport));
        cmds.push(FrameCommand::Clear(self.config.clear));
        cmds.push(FrameCommand::UseProgram);
        cmds.push(FrameCommand::SetUniform {
            location: b.time,
            value: UniformValue::Float((frame_time * self.config.time_scale) as f32),
        });
        cmds.push(FrameCommand::SetUniform {
            location: b.mvp,
            value: UniformValue::Mat4(self.transform.model_view_projection),
        });

        for batch in &self.batches {
            cmds.push(FrameCommand::BindVertexBuffer {
                buffer: batch.buffer,
                attribute: b.position,
                pointer: self.config.pointer,
            });
            cmds.push(FrameCommand::Draw {
                mode: self.draw_mode,
                first: 0,
                count: batch.vertex_count,
            });
        }
    }

    /// Stops the loop; no further frames are recorded or scheduled.
    pub fn cancel(&mut self) {
        self.token.cancel();
        if self.state != LoopState::Cancelled {
            log::info!("render loop cancelled");
        }
        self.state = LoopState::Cancelled;
    }

    /// Handle that cancels this loop from elsewhere.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BufferId;
    use crate::shader::{compile_and_link, reflect, BindingKind};

    const VERTEX: &str = r#"
@group(0) @binding(0) var<uniform> u_modelViewProjection: mat4x4<f32>;
@group(0) @binding(1) var<uniform> u_time: f32;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) v_position: vec3<f32>,
};

@vertex
fn vs_main(@location(0) a_position: vec3<f32>) -> VertexOutput {
    let lifted = vec3<f32>(a_position.x, sin(u_time), a_position.z);
    var out: VertexOutput;
    out.clip_position = u_modelViewProjection * vec4<f32>(lifted, 1.0);
    out.v_position = lifted;
    return out;
}
"#;

    const FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) v_position: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_position, 1.0);
}
"#;

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn locations() -> ProgramLocations {
        reflect(&compile_and_link(VERTEX, FRAGMENT).expect("test program links"))
    }

    fn batches() -> Vec<DrawBatch> {
        (0..3)
            .map(|i| DrawBatch { buffer: BufferId(i), vertex_count: 8 })
            .collect()
    }

    fn new_loop() -> RenderLoop {
        RenderLoop::new(&locations(), batches(), DrawMode::LineStrip, LoopConfig::default())
            .expect("bindings resolve")
    }

    const VP: Viewport = Viewport::new(800, 600);

    #[test]
    fn idle_loop_records_nothing() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        assert_eq!(lp.state(), LoopState::Idle);
        assert!(lp.frame(0.0, VP, &mut sched).is_none());
        assert_eq!(sched.requests, 0);
    }

    #[test]
    fn start_runs_once() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        assert!(lp.start(&mut sched));
        assert!(!lp.start(&mut sched));
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn frame_order_is_fixed() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);

        let cmds = lp.frame(16.0, VP, &mut sched).unwrap().commands().to_vec();
        assert_eq!(cmds[0], FrameCommand::SetViewport(VP));
        assert_eq!(cmds[1], FrameCommand::Clear(Color::BLACK));
        assert_eq!(cmds[2], FrameCommand::UseProgram);
        assert!(matches!(cmds[3], FrameCommand::SetUniform { value: UniformValue::Float(_), .. }));
        assert!(matches!(cmds[4], FrameCommand::SetUniform { value: UniformValue::Mat4(_), .. }));
        // Bind + draw per batch.
        assert_eq!(cmds.len(), 5 + 2 * 3);
        for (i, pair) in cmds[5..].chunks(2).enumerate() {
            assert!(matches!(
                pair[0],
                FrameCommand::BindVertexBuffer { buffer, .. } if buffer == BufferId(i)
            ));
            assert_eq!(
                pair[1],
                FrameCommand::Draw { mode: DrawMode::LineStrip, first: 0, count: 8 }
            );
        }
    }

    #[test]
    fn draw_order_is_the_same_every_frame() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);

        let first: Vec<_> = lp.frame(0.0, VP, &mut sched).unwrap().bound_buffers().collect();
        let second: Vec<_> = lp.frame(5000.0, VP, &mut sched).unwrap().bound_buffers().collect();
        assert_eq!(first, second);
        assert_eq!(first, [BufferId(0), BufferId(1), BufferId(2)]);
    }

    #[test]
    fn uniforms_follow_frame_time() {
        let locs = locations();
        let time = locs.uniforms.get("u_time").unwrap().location;
        let mvp = locs.uniforms.get("u_modelViewProjection").unwrap().location;

        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);

        let list = lp.frame(1000.0, VP, &mut sched).unwrap();
        assert_eq!(list.uniform(time), Some(UniformValue::Float(100.0)));
        let expected = lp.transform().model_view_projection;
        let list = lp.frame(1000.0, VP, &mut sched).unwrap();
        assert_eq!(list.uniform(mvp), Some(UniformValue::Mat4(expected)));
    }

    #[test]
    fn every_frame_schedules_the_next() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);
        for i in 0..4 {
            lp.frame(i as f64 * 16.0, VP, &mut sched);
        }
        assert_eq!(sched.requests, 5);
    }

    #[test]
    fn cancellation_stops_scheduling() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);
        lp.frame(0.0, VP, &mut sched);

        lp.token().cancel();
        assert!(lp.frame(16.0, VP, &mut sched).is_none());
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(sched.requests, 2);

        assert!(!lp.start(&mut sched));
        assert_eq!(sched.requests, 2);
    }

    #[test]
    fn cancel_before_start_is_terminal() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.cancel();
        assert!(!lp.start(&mut sched));
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(sched.requests, 0);
    }

    #[test]
    fn zero_size_viewport_is_still_recorded() {
        let mut lp = new_loop();
        let mut sched = CountingScheduler::default();
        lp.start(&mut sched);
        let list = lp.frame(0.0, Viewport::new(0, 0), &mut sched).unwrap();
        assert_eq!(list.commands()[0], FrameCommand::SetViewport(Viewport::new(0, 0)));
        assert!(lp.transform().model_view_projection.is_finite());
    }

    #[test]
    fn missing_binding_fails_construction() {
        let config = LoopConfig {
            time_uniform: "u_clock".to_owned(),
            ..LoopConfig::default()
        };
        let err = RenderLoop::new(&locations(), batches(), DrawMode::LineStrip, config)
            .err()
            .expect("u_clock is not declared");
        assert_eq!(err.kind, BindingKind::Uniform);
        assert_eq!(err.name, "u_clock");
    }
}
