//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::CameraMode;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Kaleidophone")]
#[command(about = "Audio-reactive kaleidoscope visualizer", long_about = None)]
pub struct Args {
    /// WAV file to play and visualize
    #[arg(value_name = "AUDIO", default_value = "music.wav")]
    pub audio: PathBuf,

    /// Camera mode: orbit (default), ambient
    #[arg(long, value_name = "MODE", default_value = "orbit")]
    pub camera: String,
}

impl Args {
    /// Parse camera mode from command-line arguments
    pub fn parse_camera_mode(&self) -> CameraMode {
        match self.camera.to_lowercase().as_str() {
            "orbit" => {
                println!("Camera: Orbit (drag to rotate, scroll to zoom)");
                CameraMode::Orbit
            }
            "ambient" => {
                println!("Camera: Ambient (slow auto-rotation)");
                CameraMode::Ambient
            }
            other => {
                log::warn!("unknown camera mode '{}', using orbit", other);
                CameraMode::Orbit
            }
        }
    }
}
