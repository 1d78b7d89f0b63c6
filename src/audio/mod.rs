//! Audio playback and spectrum analysis.
//!
//! Playback decodes a WAV file and streams it to the default output device on
//! a loop; the analyzer runs FFT over a mono tap of that stream and publishes
//! smoothed band energies for the visual mapping.

mod analyzer;
mod playback;

// Re-export public types
pub use analyzer::{rectified_mean, sample_from_frame, SpectrumAnalyzer, SpectrumFrame};
pub use playback::{begin_unlock, AudioFile, PendingUnlock, PlaybackHandle};
