//! WAV decoding and looped playback on the default output device.
//!
//! `cpal::Stream` is not `Send`, so the stream is built and owned by a
//! dedicated thread that parks until the `PlaybackHandle` is dropped. The
//! handle owns everything the rest of the app needs: the mono tap feeding the
//! analyzer and the stop channel keeping the stream alive.

use std::io::Read;
use std::path::Path;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Decoded audio asset: interleaved f32 samples plus the source format
pub struct AudioFile {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples normalized to [-1, 1]
    pub samples: Vec<f32>,
}

impl AudioFile {
    /// Load and fully decode a WAV file
    pub fn load(path: &Path) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open audio file {}", path.display()))?;
        Self::decode(reader).with_context(|| format!("failed to decode {}", path.display()))
    }

    fn decode<R: Read>(mut reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .context("bad float sample")?,
            hound::SampleFormat::Int => {
                // Normalize by the full scale of the source bit depth
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 * scale))
                    .collect::<Result<_, _>>()
                    .context("bad integer sample")?
            }
        };

        if samples.is_empty() {
            bail!("audio file contains no samples");
        }
        if spec.channels == 0 {
            bail!("audio file declares zero channels");
        }

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Number of whole frames (one sample per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// (left, right) pair for a frame; mono files play on both sides,
    /// extra channels beyond stereo are ignored
    pub fn frame(&self, index: usize) -> (f32, f32) {
        let base = index * self.channels as usize;
        match self.channels {
            1 => (self.samples[base], self.samples[base]),
            _ => (self.samples[base], self.samples[base + 1]),
        }
    }
}

/// Live playback session. Dropping the handle stops the stream.
pub struct PlaybackHandle {
    /// Device output rate; this is the rate the tap is filled at
    pub sample_rate: u32,

    /// Mono mix of every played frame, drained by the analyzer
    pub tap: Arc<Mutex<Vec<f32>>>,

    /// Disconnecting this channel unparks the stream thread
    _stop: mpsc::Sender<()>,
}

/// In-flight unlock request; resolves on a later poll
pub struct PendingUnlock {
    rx: mpsc::Receiver<Result<PlaybackHandle>>,
}

impl PendingUnlock {
    /// Non-blocking completion check. `None` while setup is still running,
    /// `Some` exactly once when it finishes.
    pub fn poll(&self) -> Option<Result<PlaybackHandle>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("audio setup thread exited without a result")))
            }
        }
    }
}

/// Start looped playback of `file` on the default output device.
///
/// Returns immediately; device setup happens on its own thread so a slow or
/// missing device never stalls the frame loop.
pub fn begin_unlock(file: Arc<AudioFile>) -> PendingUnlock {
    let (result_tx, result_rx) = mpsc::channel();

    thread::spawn(move || match open_output(file) {
        Ok((stream, stop_rx, handle)) => {
            if result_tx.send(Ok(handle)).is_err() {
                return;
            }
            // Park until the handle is dropped, keeping the stream alive
            let _ = stop_rx.recv();
            drop(stream);
        }
        Err(e) => {
            let _ = result_tx.send(Err(e));
        }
    });

    PendingUnlock { rx: result_rx }
}

type OpenOutput = (cpal::Stream, mpsc::Receiver<()>, PlaybackHandle);

fn open_output(file: Arc<AudioFile>) -> Result<OpenOutput> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no audio output device found"))?;
    let config = device
        .default_output_config()
        .context("failed to get audio output config")?;

    let device_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    log::info!(
        "Audio: {} @ {}Hz",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        device_rate
    );

    let tap = Arc::new(Mutex::new(Vec::<f32>::new()));
    let tap_for_callback = Arc::clone(&tap);

    // Nearest-sample rate conversion: step the file cursor at the ratio of
    // the two rates, wrapping for a seamless loop
    let rate_step = file.sample_rate as f64 / device_rate as f64;
    let frame_count = file.frame_count() as f64;
    let mut cursor = 0.0f64;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut tap = tap_for_callback.lock().unwrap();
                for frame in data.chunks_mut(channels) {
                    let (left, right) = file.frame(cursor as usize);
                    frame[0] = left;
                    if frame.len() > 1 {
                        frame[1] = right;
                    }
                    for sample in frame.iter_mut().skip(2) {
                        *sample = 0.0;
                    }
                    tap.push(0.5 * (left + right));

                    cursor += rate_step;
                    if cursor >= frame_count {
                        cursor -= frame_count;
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .context("failed to build audio output stream")?;

    stream.play().context("failed to start audio playback")?;

    let (stop_tx, stop_rx) = mpsc::channel();
    let handle = PlaybackHandle {
        sample_rate: device_rate,
        tap,
        _stop: stop_tx,
    };
    Ok((stream, stop_rx, handle))
}
