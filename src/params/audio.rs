//! Spectral analysis configuration with frequency band mappings.

use std::ops::Range;

use anyhow::{bail, Result};

/// Spectral analysis configuration.
///
/// Band energies are published in a 0-255 domain and divided back down by the
/// per-frame adapter, so thresholds elsewhere stay in [0,1].
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Audio sample rate (Hz); replaced by the device rate when the
    /// analyzer attaches to a live stream
    pub sample_rate_hz: u32,

    /// FFT window size in samples (must be power of 2)
    pub fft_size: usize,

    /// Per-bin exponential smoothing factor in [0,1);
    /// 0 = no smoothing, values near 1 = heavy smoothing
    pub smoothing: f32,

    /// Analysis thread update interval (milliseconds)
    pub update_interval_ms: u64,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// Treble frequency range (Hz)
    pub treble_range_hz: (f32, f32),
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            smoothing: 0.9,
            update_interval_ms: 16,
            bass_range_hz: (20.0, 140.0),
            mid_range_hz: (400.0, 2600.0),
            treble_range_hz: (5200.0, 14000.0),
        }
    }
}

impl SpectrumConfig {
    /// Copy of this config with the sample rate pinned to a live stream's rate
    pub fn with_sample_rate(&self, sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            ..self.clone()
        }
    }

    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// FFT bin range for bass frequencies
    pub fn bass_bins(&self) -> Range<usize> {
        self.band_bins(self.bass_range_hz)
    }

    /// FFT bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.band_bins(self.mid_range_hz)
    }

    /// FFT bin range for treble frequencies
    pub fn treble_bins(&self) -> Range<usize> {
        self.band_bins(self.treble_range_hz)
    }

    /// Clamp a band's bin range to the usable half of the spectrum
    fn band_bins(&self, range_hz: (f32, f32)) -> Range<usize> {
        let half = self.fft_size / 2;
        let start = self.hz_to_bin(range_hz.0).min(half);
        let end = self.hz_to_bin(range_hz.1).min(half);
        start..end.max(start)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() {
            bail!("FFT size must be power of 2, got {}", self.fft_size);
        }
        if self.sample_rate_hz == 0 {
            bail!("sample rate must be > 0");
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            bail!("smoothing must be in [0,1), got {}", self.smoothing);
        }
        for (name, range) in [
            ("bass", self.bass_range_hz),
            ("mid", self.mid_range_hz),
            ("treble", self.treble_range_hz),
        ] {
            if range.0 >= range.1 {
                bail!("{} range must be ascending, got {:?}", name, range);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_bin() {
        let config = SpectrumConfig::default();

        // At 44100 Hz sample rate and 1024 FFT size:
        // Bin resolution = 44100 / 1024 ≈ 43.07 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(43.07), 1);
        assert_eq!(config.hz_to_bin(100.0), 2);
    }

    #[test]
    fn test_band_ranges_ordered_and_disjoint() {
        let config = SpectrumConfig::default();

        let bass = config.bass_bins();
        let mid = config.mid_bins();
        let treble = config.treble_bins();

        assert!(!bass.is_empty());
        assert!(!mid.is_empty());
        assert!(!treble.is_empty());

        // Bands ascend without overlapping
        assert!(bass.end <= mid.start);
        assert!(mid.end <= treble.start);

        // Treble tops out inside the usable half of the spectrum
        assert!(treble.end <= config.fft_size / 2);
    }

    #[test]
    fn test_band_bins_clamped_to_nyquist() {
        let config = SpectrumConfig {
            sample_rate_hz: 8000,
            ..SpectrumConfig::default()
        };

        // 5200-14000 Hz lies beyond the 4000 Hz Nyquist limit at 8 kHz
        let treble = config.treble_bins();
        assert!(treble.is_empty());
        assert!(treble.start <= config.fft_size / 2);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = SpectrumConfig::default();
        assert!(config.validate().is_ok());

        config.fft_size = 1000;
        assert!(config.validate().is_err());

        config.fft_size = 1024;
        config.smoothing = 1.0;
        assert!(config.validate().is_err());

        config.smoothing = 0.9;
        config.bass_range_hz = (140.0, 20.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_sample_rate_moves_bins() {
        let config = SpectrumConfig::default();
        let faster = config.with_sample_rate(88200);

        // Doubling the rate halves the bin index for a fixed frequency
        assert_eq!(faster.hz_to_bin(200.0), config.hz_to_bin(100.0));
    }
}
