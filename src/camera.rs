//! Camera state, pointer interaction, and view matrices.

use glam::{Mat4, Vec3};

use crate::params::{CameraMode, CameraTuning, RenderConfig};

/// Orbit camera state; lives for the whole session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Pitch (radians)
    pub rotation_x: f32,

    /// Yaw (radians)
    pub rotation_y: f32,

    /// Multiplicative distance factor; always > 0
    pub zoom: f32,
}

impl CameraState {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: tuning.initial_zoom,
        }
    }
}

/// View matrix: push the scene back by the zoom-scaled depth, then apply the
/// accumulated rotations
pub fn view_matrix(camera: &CameraState, config: &RenderConfig) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -config.camera_depth * camera.zoom))
        * Mat4::from_rotation_x(camera.rotation_x)
        * Mat4::from_rotation_y(camera.rotation_y)
}

/// Combined view-projection matrix for the given viewport
pub fn view_proj_matrix(camera: &CameraState, config: &RenderConfig, viewport: (f32, f32)) -> Mat4 {
    let aspect = viewport.0 / viewport.1;
    let proj = Mat4::perspective_rh(
        config.fov_degrees.to_radians(),
        aspect,
        config.near_plane,
        config.far_plane,
    );
    proj * view_matrix(camera, config)
}

/// Pointer interaction state: drag-to-rotate, scroll-to-zoom, and the
/// ambient autopilot
pub struct InteractionController {
    mode: CameraMode,
    tuning: CameraTuning,
    dragging: bool,
    last_position: Option<(f32, f32)>,
    ambient_angle: f32,
}

impl InteractionController {
    pub fn new(mode: CameraMode, tuning: CameraTuning) -> Self {
        Self {
            mode,
            tuning,
            dragging: false,
            last_position: None,
            ambient_angle: 0.0,
        }
    }

    /// Pointer press arms dragging from this position
    pub fn on_press(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_position = Some((x, y));
    }

    /// Pointer release disarms dragging
    pub fn on_release(&mut self) {
        self.dragging = false;
        self.last_position = None;
    }

    /// Pointer motion while armed accumulates rotation from the move delta
    pub fn on_move(&mut self, camera: &mut CameraState, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        let Some((last_x, last_y)) = self.last_position else {
            self.last_position = Some((x, y));
            return;
        };
        self.last_position = Some((x, y));

        if self.mode == CameraMode::Ambient {
            return;
        }
        camera.rotation_y += (x - last_x) * self.tuning.drag_rotate_rad_per_px;
        camera.rotation_x += (y - last_y) * self.tuning.drag_rotate_rad_per_px;
    }

    /// Scroll steps multiply zoom: negative delta zooms in, positive out.
    /// Zoom stays strictly positive at any step count.
    pub fn on_scroll(&mut self, camera: &mut CameraState, delta: f32) {
        if delta < 0.0 {
            camera.zoom *= self.tuning.zoom_in_factor;
        } else if delta > 0.0 {
            camera.zoom *= self.tuning.zoom_out_factor;
        }
    }

    /// Advance the ambient autopilot by one tick; no-op in orbit mode
    pub fn advance_ambient(&mut self, camera: &mut CameraState) {
        if self.mode != CameraMode::Ambient {
            return;
        }
        self.ambient_angle += self.tuning.ambient_spin_rad_per_tick;
        camera.rotation_y = self.ambient_angle;
        camera.rotation_x = self.ambient_angle * self.tuning.ambient_pitch_ratio;
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }
}
