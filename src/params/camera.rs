//! Camera interaction tuning and mode selection.

use anyhow::{bail, Result};

/// Camera mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Interactive orbit: pointer drag rotates, scroll zooms
    Orbit,

    /// Slow automatic rotation; drags are ignored, scroll still zooms
    Ambient,
}

impl Default for CameraMode {
    fn default() -> Self {
        Self::Orbit
    }
}

/// Pointer interaction tuning
#[derive(Debug, Clone)]
pub struct CameraTuning {
    /// Rotation accumulated per pixel of pointer drag (radians)
    pub drag_rotate_rad_per_px: f32,

    /// Zoom multiplier per scroll-in step (must be < 1)
    pub zoom_in_factor: f32,

    /// Zoom multiplier per scroll-out step (must be > 1)
    pub zoom_out_factor: f32,

    /// Ambient autopilot yaw advance per tick (radians)
    pub ambient_spin_rad_per_tick: f32,

    /// Ambient pitch as a fraction of the autopilot yaw
    pub ambient_pitch_ratio: f32,

    /// Zoom at session start (1.0 = the configured camera depth)
    pub initial_zoom: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            drag_rotate_rad_per_px: 0.01,
            zoom_in_factor: 0.95,
            zoom_out_factor: 1.05,
            ambient_spin_rad_per_tick: 0.002,
            ambient_pitch_ratio: 0.7,
            initial_zoom: 1.0,
        }
    }
}

impl CameraTuning {
    /// Validate configuration (zoom factors on the right side of 1, etc.)
    pub fn validate(&self) -> Result<()> {
        if self.zoom_in_factor <= 0.0 || self.zoom_in_factor >= 1.0 {
            bail!("zoom-in factor must be in (0,1), got {}", self.zoom_in_factor);
        }
        if self.zoom_out_factor <= 1.0 {
            bail!("zoom-out factor must be > 1, got {}", self.zoom_out_factor);
        }
        if self.initial_zoom <= 0.0 {
            bail!("initial zoom must be > 0, got {}", self.initial_zoom);
        }
        Ok(())
    }
}
