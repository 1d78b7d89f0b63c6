//! Transient object class configuration.
//!
//! Both decorative classes share one parameter record; the two presets below
//! are the only instances, so spawn/update/expire logic stays generic.

use anyhow::{bail, Result};

use crate::mapper::FrameAudioState;

/// Which band energy gates a class's spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerBand {
    Bass,
    Treble,
}

impl TriggerBand {
    /// Read this band's level from the current frame's audio state
    pub fn level(&self, audio: &FrameAudioState) -> f32 {
        match self {
            TriggerBand::Bass => audio.bass,
            TriggerBand::Treble => audio.treble,
        }
    }
}

/// Parameter record for one transient object class
#[derive(Debug, Clone, Copy)]
pub struct ObjectClassParams {
    /// Lifespan range (milliseconds), drawn uniformly at spawn
    pub lifespan_ms: (f32, f32),

    /// Orbit radius range (world units), drawn uniformly at spawn
    pub orbit_radius: (f32, f32),

    /// Orbit angle advance per tick (radians)
    pub angular_velocity_rad: f32,

    /// Peak of the rise-fall scale envelope (dimensionless)
    pub scale_amplitude: f32,

    /// Vertical bobbing amplitude (world units); 0 keeps the orbit planar
    pub vertical_amplitude: f32,

    /// Sphere radius at scale 1.0 (world units)
    pub base_radius: f32,

    /// Band level that must be exceeded for a spawn
    pub spawn_threshold: f32,

    /// Tick modulus gating spawns (at most one spawn per interval)
    pub spawn_interval_ticks: u64,

    /// Band whose level is tested against the threshold
    pub trigger: TriggerBand,
}

impl ObjectClassParams {
    /// Pulse shapes: slow planar orbiters driven by bass hits
    pub fn pulse_shape() -> Self {
        Self {
            lifespan_ms: (5000.0, 10000.0),
            orbit_radius: (50.0, 200.0),
            angular_velocity_rad: 0.01,
            scale_amplitude: 1.0,
            vertical_amplitude: 0.0,
            base_radius: 30.0,
            spawn_threshold: 0.8,
            spawn_interval_ticks: 15,
            trigger: TriggerBand::Bass,
        }
    }

    /// Spark orbs: quick bobbing orbiters driven by treble
    pub fn spark_orb() -> Self {
        Self {
            lifespan_ms: (3000.0, 6000.0),
            orbit_radius: (100.0, 250.0),
            angular_velocity_rad: 0.02,
            scale_amplitude: 0.5,
            vertical_amplitude: 50.0,
            base_radius: 12.0,
            spawn_threshold: 0.7,
            spawn_interval_ticks: 20,
            trigger: TriggerBand::Treble,
        }
    }

    /// Validate configuration (ranges ascending, positive envelope)
    pub fn validate(&self) -> Result<()> {
        if self.lifespan_ms.0 <= 0.0 || self.lifespan_ms.0 > self.lifespan_ms.1 {
            bail!("lifespan range must be positive ascending, got {:?}", self.lifespan_ms);
        }
        if self.orbit_radius.0 < 0.0 || self.orbit_radius.0 > self.orbit_radius.1 {
            bail!("orbit radius range must be ascending, got {:?}", self.orbit_radius);
        }
        if self.scale_amplitude <= 0.0 {
            bail!("scale amplitude must be > 0, got {}", self.scale_amplitude);
        }
        if self.spawn_interval_ticks == 0 {
            bail!("spawn interval must be >= 1 tick");
        }
        Ok(())
    }
}
