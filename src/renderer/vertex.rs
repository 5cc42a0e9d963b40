//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in normalized device coordinates with an RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Bug palette (linear-ish greys with a red eye)
pub mod colors {
    pub const BODY: [f32; 4] = [0.133, 0.133, 0.133, 1.0]; // #222222
    pub const HEAD: [f32; 4] = [0.2, 0.2, 0.2, 1.0]; // #333333
    pub const EYE: [f32; 4] = [1.0, 0.2, 0.0, 1.0]; // #ff3300
    pub const LIMB: [f32; 4] = [0.067, 0.067, 0.067, 1.0]; // #111111
    /// Overlay stays see-through where the bug isn't
    pub const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
}
