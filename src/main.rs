//! Kaleidophone - an audio-reactive kaleidoscope
//!
//! A WAV file drives a breathing, wave-distorted sphere wrapped in six-way
//! kaleidoscopic color. Bass and treble spikes spawn short-lived orbiting
//! shapes; the pointer orbits the camera.

mod audio;
mod camera;
mod cli;
mod mapper;
mod mesh;
mod objects;
mod params;
mod rendering;
mod scene;
mod world;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{begin_unlock, AudioFile, PendingUnlock, PlaybackHandle, SpectrumAnalyzer};
use camera::InteractionController;
use cli::Args;
use mapper::FrameAudioState;
use params::{CameraTuning, ObjectClassParams, RenderConfig, SpectrumConfig};
use rendering::RenderSystem;
use scene::{compose_frame, FramePlan};
use world::World;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation state
    world: World,
    interaction: InteractionController,

    // Audio pipeline; playback and analyzer appear after the first click.
    // The handle is held only to keep the stream alive.
    audio_file: Arc<AudioFile>,
    _playback: Option<PlaybackHandle>,
    pending_unlock: Option<PendingUnlock>,
    analyzer: Option<SpectrumAnalyzer>,

    // Configuration
    spectrum_config: SpectrumConfig,
    render_config: RenderConfig,

    // Input and time tracking
    cursor_position: (f32, f32),
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let camera_mode = args.parse_camera_mode();

        let tuning = CameraTuning::default();
        tuning.validate()?;
        let spectrum_config = SpectrumConfig::default();
        spectrum_config.validate()?;
        let render_config = RenderConfig::default();
        render_config.validate()?;
        ObjectClassParams::pulse_shape().validate()?;
        ObjectClassParams::spark_orb().validate()?;

        let audio_file = Arc::new(AudioFile::load(&args.audio)?);
        log::info!(
            "Loaded {}: {} ch @ {}Hz, {:.1}s",
            args.audio.display(),
            audio_file.channels,
            audio_file.sample_rate,
            audio_file.frame_count() as f32 / audio_file.sample_rate as f32
        );

        Ok(Self {
            window: None,
            render_system: None,
            world: World::new(&tuning),
            interaction: InteractionController::new(camera_mode, tuning),
            audio_file,
            _playback: None,
            pending_unlock: None,
            analyzer: None,
            spectrum_config,
            render_config,
            cursor_position: (0.0, 0.0),
            start_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Kaleidophone - Audio-Reactive Kaleidoscope")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.render_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("failed to initialize rendering: {e:#}");
                event_loop.exit();
                return;
            }
        };

        println!("\nKaleidophone is running!");
        println!("Click to start the music. Drag to rotate, scroll to zoom.");
        println!("Press ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                log::info!("exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.request_unlock();
                    let (x, y) = self.cursor_position;
                    self.interaction.on_press(x, y);
                }
                ElementState::Released => self.interaction.on_release(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x as f32, position.y as f32);
                self.interaction.on_move(
                    &mut self.world.camera,
                    self.cursor_position.0,
                    self.cursor_position.1,
                );
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Scroll up (wheel away) zooms in, so line/pixel deltas negate
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) * 0.01,
                };
                self.interaction.on_scroll(&mut self.world.camera, delta);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// First click kicks off the audio unlock; later clicks only drive
    /// the camera
    fn request_unlock(&mut self) {
        if self.world.session.started() || self.pending_unlock.is_some() {
            return;
        }
        log::info!("unlocking audio playback");
        self.pending_unlock = Some(begin_unlock(Arc::clone(&self.audio_file)));
    }

    /// Observe a finished unlock request: attach the analyzer to the playback
    /// tap and start the session. A failed unlock is logged and cleared so
    /// the next click can retry.
    fn poll_unlock(&mut self) {
        let Some(pending) = &self.pending_unlock else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        self.pending_unlock = None;

        match result {
            Ok(handle) => {
                let config = self.spectrum_config.with_sample_rate(handle.sample_rate);
                self.analyzer = Some(SpectrumAnalyzer::attach(Arc::clone(&handle.tap), config));
                self._playback = Some(handle);
                self.world.session.begin();
                log::info!("session started");
            }
            Err(e) => {
                log::warn!("audio unlock failed: {e:#}; click to retry");
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        self.poll_unlock();

        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let elapsed = self.start_time.elapsed();
        let time_s = elapsed.as_secs_f32();
        let now_ms = elapsed.as_secs_f64() * 1000.0;
        let viewport = render_system.viewport();

        let plan = if self.world.session.started() {
            let audio = self
                .analyzer
                .as_ref()
                .map(|analyzer| analyzer.sample())
                .unwrap_or_else(FrameAudioState::silence);

            self.interaction.advance_ambient(&mut self.world.camera);
            self.world.advance(&audio, now_ms);
            compose_frame(&self.world, &audio, time_s, viewport, &self.render_config)
        } else {
            FramePlan::clear_only(self.world.camera, viewport)
        };

        match render_system.render(&plan) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("surface error: {e:?}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Kaleidophone - audio-reactive kaleidoscope");

    let args = Args::parse();
    let mut app = App::new(&args).context("failed to initialize")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("event loop error")?;
    Ok(())
}
