//! Top-level mutable state threaded through each frame.

use crate::camera::CameraState;
use crate::mapper::FrameAudioState;
use crate::objects::TransientField;
use crate::params::CameraTuning;

/// One-way latch flipped when audio playback has been unlocked.
/// Nothing is drawn before it flips.
#[derive(Debug, Default)]
pub struct SessionState {
    started: bool,
}

impl SessionState {
    pub fn begin(&mut self) {
        self.started = true;
    }

    pub fn started(&self) -> bool {
        self.started
    }
}

/// Everything that persists across frames
pub struct World {
    pub session: SessionState,
    pub camera: CameraState,
    pub objects: TransientField,
}

impl World {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            session: SessionState::default(),
            camera: CameraState::new(tuning),
            objects: TransientField::new(),
        }
    }

    /// Per-tick simulation step; only the transient field evolves here,
    /// camera motion is driven by the interaction layer. Inert until the
    /// session has started.
    pub fn advance(&mut self, audio: &FrameAudioState, now_ms: f64) {
        if !self.session.started() {
            return;
        }
        self.objects.tick(audio, now_ms);
    }
}
