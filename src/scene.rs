//! Per-frame scene composition.
//!
//! `compose_frame` turns world + audio state into a `FramePlan`: the ordered
//! list of draw calls for one frame. It performs no GPU work itself, so the
//! full draw protocol is testable headless.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::camera::CameraState;
use crate::mapper::{map_uniforms, FrameAudioState, ShaderUniformSet};
use crate::params::RenderConfig;
use crate::world::World;

/// Geometry selector for a draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere { radius: f32 },
}

/// One instance to draw: shader inputs, geometry, and the model-space yaw
/// applied before the camera transform
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub uniforms: ShaderUniformSet,
    pub primitive: Primitive,
    pub spin: f32,
}

/// Everything the render backend needs for one frame
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub camera: CameraState,
    pub viewport: (f32, f32),
    pub draws: Vec<DrawCall>,
}

impl FramePlan {
    /// A plan that clears to black and draws nothing
    pub fn clear_only(camera: CameraState, viewport: (f32, f32)) -> Self {
        Self {
            camera,
            viewport,
            draws: Vec::new(),
        }
    }
}

/// Build the draw list for one frame: main shape first, then live transient
/// objects in insertion order. Before the session starts, or with a
/// degenerate viewport, the plan is clear-only.
pub fn compose_frame(
    world: &World,
    audio: &FrameAudioState,
    time_s: f32,
    viewport: (f32, f32),
    config: &RenderConfig,
) -> FramePlan {
    if !world.session.started() || viewport.0 <= 0.0 || viewport.1 <= 0.0 {
        return FramePlan::clear_only(world.camera, viewport);
    }

    let mut draws = Vec::with_capacity(1 + world.objects.len());

    draws.push(DrawCall {
        uniforms: map_uniforms(audio, time_s, viewport, 0.0, Vec3::ZERO),
        primitive: Primitive::Sphere {
            radius: config.main_shape_radius,
        },
        spin: 0.0,
    });

    for object in world.objects.iter() {
        draws.push(DrawCall {
            uniforms: map_uniforms(audio, time_s, viewport, object.seed, object.offset()),
            primitive: Primitive::Sphere {
                radius: object.draw_radius(),
            },
            spin: object.seed * TAU + object.angle,
        });
    }

    FramePlan {
        camera: world.camera,
        viewport,
        draws,
    }
}
