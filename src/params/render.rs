//! Rendering configuration.

use anyhow::{bail, Result};

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units); the scene spans a few hundred units
    /// around the origin, with generous headroom for zoomed-out views
    pub far_plane: f32,

    /// Camera distance from the origin at zoom 1.0 (world units)
    pub camera_depth: f32,

    /// Radius of the main persistent sphere (world units)
    pub main_shape_radius: f32,

    /// UV-sphere tessellation (segments along both axes)
    pub sphere_segments: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 60.0,
            near_plane: 0.1,
            far_plane: 10000.0,
            camera_depth: 800.0,
            main_shape_radius: 100.0,
            sphere_segments: 80,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    /// Validate configuration (positive dimensions, sane planes)
    pub fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_height == 0 {
            bail!(
                "window dimensions must be non-zero, got {}x{}",
                self.window_width,
                self.window_height
            );
        }
        if self.near_plane <= 0.0 || self.near_plane >= self.far_plane {
            bail!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near_plane,
                self.far_plane
            );
        }
        if self.sphere_segments < 3 {
            bail!("sphere needs at least 3 segments, got {}", self.sphere_segments);
        }
        Ok(())
    }
}
