//! Unit-sphere mesh shared by every draw call.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Vertex data for the sphere mesh (position + outward normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unit UV-sphere; per-object radius is applied in the model matrix, so one
/// mesh serves the main shape and every transient object
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn new(segments: u32) -> Self {
        let mut vertices = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
        let mut indices = Vec::new();

        // Latitude rings from pole to pole, longitude around the vertical axis
        for lat in 0..=segments {
            let theta = lat as f32 * PI / segments as f32;
            for lon in 0..=segments {
                let phi = lon as f32 * TAU / segments as f32;
                let position = [
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                ];

                // Unit sphere: the outward normal is the position itself
                vertices.push(Vertex {
                    position,
                    normal: position,
                });
            }
        }

        // Two triangles per quad between adjacent latitude rings
        for lat in 0..segments {
            for lon in 0..segments {
                let top_left = lat * (segments + 1) + lon;
                let top_right = top_left + 1;
                let bottom_left = (lat + 1) * (segments + 1) + lon;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self { vertices, indices }
    }
}
