//! Vertex streams: separate position and color buffers

use super::shader::AttributeLocations;

/// xyz position (w is filled in as 1 by vertex fetch)
pub type Position = [f32; 3];
/// rgb color (alpha is filled in as 1 by vertex fetch)
pub type Color = [f32; 3];

/// Buffer slot for positions
pub const POSITION_SLOT: u32 = 0;
/// Buffer slot for colors
pub const COLOR_SLOT: u32 = 1;

/// Attribute descriptions bound to the program's resolved locations
pub struct VertexStreams {
    position: [wgpu::VertexAttribute; 1],
    color: [wgpu::VertexAttribute; 1],
}

impl VertexStreams {
    pub fn new(locations: &AttributeLocations) -> Self {
        Self {
            position: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: locations.position,
                format: wgpu::VertexFormat::Float32x3,
            }],
            color: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: locations.color,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }

    /// Layouts in slot order (`POSITION_SLOT`, `COLOR_SLOT`)
    pub fn layouts(&self) -> [wgpu::VertexBufferLayout<'_>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Position>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.position,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Color>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.color,
            },
        ]
    }
}
