//! Spectrum analysis thread and the normalization adapter.
//!
//! The thread wakes on a fixed interval, windows the newest samples from the
//! playback tap, and publishes per-band energies on a 0-255 scale with
//! exponential per-bin smoothing. `sample_from_frame` converts a published
//! frame into the [0,1] values the visual mapping consumes.

use std::f32::consts::PI;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rustfft::{num_complex::Complex, FftPlanner};

use crate::mapper::FrameAudioState;
use crate::params::SpectrumConfig;

/// One published analysis result
#[derive(Debug, Clone, Default)]
pub struct SpectrumFrame {
    /// Smoothed band energies, 0-255
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,

    /// Raw time-domain samples of the analyzed window
    pub waveform: Vec<f32>,
}

/// Handle to the running analysis thread
pub struct SpectrumAnalyzer {
    frame: Arc<Mutex<SpectrumFrame>>,

    /// Analysis thread handle (runs for the life of the process)
    _thread: thread::JoinHandle<()>,
}

impl SpectrumAnalyzer {
    /// Attach an analysis thread to a playback tap.
    ///
    /// `config.sample_rate_hz` must match the rate the tap is filled at, or
    /// the band ranges land on the wrong bins.
    pub fn attach(tap: Arc<Mutex<Vec<f32>>>, config: SpectrumConfig) -> Self {
        log::info!(
            "Analyzer: {} bins @ {}Hz, {}ms interval",
            config.fft_size,
            config.sample_rate_hz,
            config.update_interval_ms
        );

        let frame = Arc::new(Mutex::new(SpectrumFrame::default()));
        let frame_out = Arc::clone(&frame);

        let thread = thread::spawn(move || analysis_loop(config, tap, frame_out));

        Self {
            frame,
            _thread: thread,
        }
    }

    /// Latest published frame (thread-safe)
    pub fn frame(&self) -> SpectrumFrame {
        self.frame.lock().unwrap().clone()
    }

    /// Latest frame, normalized for the visual mapping
    pub fn sample(&self) -> FrameAudioState {
        sample_from_frame(&self.frame())
    }
}

fn analysis_loop(
    config: SpectrumConfig,
    tap: Arc<Mutex<Vec<f32>>>,
    out: Arc<Mutex<SpectrumFrame>>,
) {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(config.fft_size);
    let mut fft_buffer = vec![Complex::new(0.0, 0.0); config.fft_size];
    let mut smoothed = vec![0.0f32; config.fft_size / 2];

    loop {
        thread::sleep(Duration::from_millis(config.update_interval_ms));

        let waveform = {
            let mut samples = tap.lock().unwrap();
            if samples.len() < config.fft_size {
                continue;
            }

            // Window the newest fft_size samples with a Hann taper
            let start = samples.len() - config.fft_size;
            for i in 0..config.fft_size {
                let window = hann_window(i, config.fft_size);
                fft_buffer[i] = Complex::new(samples[start + i] * window, 0.0);
            }
            let waveform = samples[start..].to_vec();

            // Keep a half-window tail so successive windows overlap; this
            // also bounds the tap between wakeups
            let drain_to = samples.len() - config.fft_size / 2;
            samples.drain(0..drain_to);

            waveform
        };

        fft.process(&mut fft_buffer);

        // Single-sided amplitude on the 0-255 scale, then per-bin smoothing
        for (bin, value) in smoothed.iter_mut().enumerate() {
            let amplitude = 2.0 * fft_buffer[bin].norm() / config.fft_size as f32;
            let energy = (amplitude * 255.0).min(255.0);
            *value = config.smoothing * *value + (1.0 - config.smoothing) * energy;
        }

        *out.lock().unwrap() = SpectrumFrame {
            bass: band_energy(&smoothed, config.bass_bins()),
            mid: band_energy(&smoothed, config.mid_bins()),
            treble: band_energy(&smoothed, config.treble_bins()),
            waveform,
        };
    }
}

/// Normalize a published frame to the [0,1] ranges the mapper expects
pub fn sample_from_frame(frame: &SpectrumFrame) -> FrameAudioState {
    FrameAudioState {
        bass: (frame.bass / 255.0).clamp(0.0, 1.0),
        mid: (frame.mid / 255.0).clamp(0.0, 1.0),
        treble: (frame.treble / 255.0).clamp(0.0, 1.0),
        avg_amplitude: rectified_mean(&frame.waveform),
    }
}

/// Mean absolute value of a sample window; 0 for an empty window
pub fn rectified_mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32
}

/// Mean smoothed energy over a bin range; 0 for a band with no bins
fn band_energy(smoothed: &[f32], bins: Range<usize>) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let count = bins.len() as f32;
    smoothed[bins].iter().sum::<f32>() / count
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
