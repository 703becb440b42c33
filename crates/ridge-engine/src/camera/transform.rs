use glam::{Mat4, Vec3};

use crate::coords::Viewport;

/// Time-parameterized camera drift.
///
/// The pose is a pure function of frame time: there is no velocity or
/// accumulated state, so any frame time can be evaluated out of order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraDrift {
    /// Horizontal oscillation rate, radians per millisecond.
    pub sway_rate: f64,
    pub sway_amplitude: f64,
    /// Vertical oscillation rate, radians per millisecond.
    pub bob_rate: f64,
    /// Height the vertical oscillation hangs from.
    pub bob_base: f64,
    /// Peak-to-peak vertical travel.
    pub bob_amplitude: f64,
    pub depth: f64,
}

impl Default for CameraDrift {
    fn default() -> Self {
        Self {
            sway_rate: 0.00125,
            sway_amplitude: 2.0,
            bob_rate: 0.001,
            bob_base: -3.0,
            bob_amplitude: 6.0,
            depth: -64.0,
        }
    }
}

impl CameraDrift {
    /// Model translation at `frame_time` (milliseconds).
    pub fn translation(&self, frame_time: f64) -> Vec3 {
        let x = (frame_time * self.sway_rate).sin() * self.sway_amplitude;
        let y = self.bob_base - (1.0 + (frame_time * self.bob_rate).sin()) * 0.5 * self.bob_amplitude;
        Vec3::new(x as f32, y as f32, self.depth as f32)
    }
}

/// Projection and drift constants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub drift: CameraDrift,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 1000.0,
            drift: CameraDrift::default(),
        }
    }
}

/// Per-frame matrix scratch space.
///
/// Owned by the frame loop and rewritten in place every frame. Nothing is
/// carried between frames: every field is derived from the frame time and the
/// viewport alone.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    pub model: Mat4,
    pub view: Mat4,
    pub inverse_view: Mat4,
    pub model_view: Mat4,
    pub view_projection: Mat4,
    pub model_view_projection: Mat4,
    pub perspective: Mat4,
    /// Pixel-space projection; kept current for alternate projection modes.
    pub orthogonal: Mat4,
    pub translation: Vec3,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            model_view_projection: Mat4::IDENTITY,
            perspective: Mat4::IDENTITY,
            orthogonal: Mat4::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every matrix for `frame_time` (milliseconds) and `viewport`.
    ///
    /// Composition is column-vector, right to left: model, then view, then
    /// projection.
    pub fn update(&mut self, frame_time: f64, viewport: Viewport, camera: &CameraParams) {
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;

        self.perspective =
            Mat4::perspective_rh(camera.fov_y, viewport.aspect_ratio(), camera.near, camera.far);
        self.orthogonal = Mat4::orthographic_rh(width, 0.0, height, 0.0, camera.near, camera.far);

        self.translation = camera.drift.translation(frame_time);

        self.view = Mat4::IDENTITY;
        self.inverse_view = self.view.inverse();
        self.model = Mat4::from_translation(self.translation);

        self.model_view = self.model * self.view;
        self.view_projection = self.perspective * self.view;
        self.model_view_projection = self.perspective * self.model_view;
    }
}
