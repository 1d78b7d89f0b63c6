//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, milliseconds, radians, etc.)
//! - Documented ranges and meanings
//! - Startup validation

mod audio;
mod camera;
mod objects;
mod render;

// Re-export all types
pub use audio::SpectrumConfig;
pub use camera::{CameraMode, CameraTuning};
pub use objects::{ObjectClassParams, TriggerBand};
pub use render::RenderConfig;
