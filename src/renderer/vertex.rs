//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements. Enemy bodies use per-archetype colors from
/// tuning instead.
pub mod colors {
    /// Letterbox area outside the field
    pub const LETTERBOX: [f32; 4] = [0.02, 0.03, 0.02, 1.0];
    /// The field itself
    pub const BACKGROUND: [f32; 4] = [0.06, 0.08, 0.04, 1.0];
    pub const GRID: [f32; 4] = [0.09, 0.12, 0.06, 1.0];
    pub const PLAYER: [f32; 4] = [0.85, 0.68, 0.42, 1.0];
    pub const PLAYER_EYE: [f32; 4] = [0.10, 0.08, 0.05, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const HP_BACK: [f32; 4] = [0.05, 0.05, 0.06, 0.8];
    pub const HP_PLAYER: [f32; 4] = [0.3, 0.85, 0.35, 1.0];
    pub const HP_ENEMY: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const TIMER_BACK: [f32; 4] = [0.05, 0.05, 0.06, 0.7];
    pub const TIMER_FILL: [f32; 4] = [1.0, 0.84, 0.25, 1.0];
    pub const DASH_READY: [f32; 4] = [0.45, 0.85, 1.0, 1.0];
    pub const DAMAGE_MARK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
