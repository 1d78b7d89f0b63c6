//! Kaleidophone library - audio-reactive kaleidoscope visualizer

pub mod audio;
pub mod camera;
pub mod cli;
pub mod mapper;
pub mod mesh;
pub mod objects;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod world;
