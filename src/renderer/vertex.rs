//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

/// Convert a `0xRRGGBB` sRGB color to linear RGBA for an sRGB surface
pub fn srgb(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), alpha]
}

/// Colors for game elements (sRGB hex)
pub mod colors {
    pub const BACKGROUND: u32 = 0xeef6ff;
    pub const LANE: u32 = 0xdde8f6;

    pub const ORDER_BOX: u32 = 0xc78e3f;
    pub const ORDER_EDGE: u32 = 0x7b531f;
    pub const ORDER_TAPE: u32 = 0xe5d2a4;
    pub const BARCODE: u32 = 0x222222;

    pub const PHISH: u32 = 0xe43d3d;
    pub const WHITE: u32 = 0xffffff;

    pub const USB_BODY: u32 = 0x111111;
    pub const USB_PLUG: u32 = 0x444444;
    pub const SKULL: u32 = 0xf4f4f4;

    pub const FLOOD: u32 = 0x3d7ae4;
    pub const FLOOD_WAVE: u32 = 0xa9c4ff;

    pub const GOOSE_BODY: u32 = 0xfdfdfd;
    pub const GOOSE_OUTLINE: u32 = 0x9aa7b8;
    pub const GOOSE_BEAK: u32 = 0xf59a23;
    pub const GOOSE_EYE: u32 = 0x1b1b1b;

    pub const SCRIM: u32 = 0x000000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_endpoints() {
        assert_eq!(srgb(0x000000, 1.0), [0.0, 0.0, 0.0, 1.0]);
        let white = srgb(0xffffff, 0.5);
        for c in &white[..3] {
            assert!((c - 1.0).abs() < 1e-6);
        }
        assert_eq!(white[3], 0.5);
        // Mid grey is darker in linear space
        assert!(srgb(0x808080, 1.0)[0] < 0.25);
    }
}
