//! Id pass formats and per-object uniforms.
//!
//! Every registered object is drawn into the id buffer with its encoded id as
//! a flat, unblended color. The buffer is cleared to black, so the background
//! decodes to id 0.

use idmap_core::{decode_normalized, encode, PickId};

/// Color format of the id buffer. `Rgba8Unorm` stores the encoded bytes exactly.
pub const ID_BUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth format of the id pass.
pub const ID_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// GPU uniforms carrying one object's id color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IdColorUniforms {
    /// Encoded id as normalized RGBA (alpha is always 1).
    pub id_color: [f32; 4],
}

impl Default for IdColorUniforms {
    fn default() -> Self {
        Self::new(PickId::BACKGROUND)
    }
}

impl IdColorUniforms {
    /// Creates uniforms for `id`.
    #[must_use]
    pub fn new(id: PickId) -> Self {
        Self {
            id_color: encode(id).to_normalized().to_array(),
        }
    }

    /// Returns the id these uniforms encode.
    #[must_use]
    pub fn id(&self) -> PickId {
        decode_normalized(glam::Vec4::from_array(self.id_color))
    }
}

/// Color target for id pass pipelines: id format, no blending.
#[must_use]
pub fn id_color_target() -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format: ID_BUFFER_FORMAT,
        blend: None, // Blending would corrupt the encoded id
        write_mask: wgpu::ColorWrites::ALL,
    }
}

/// Depth state for id pass pipelines.
#[must_use]
pub fn id_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: ID_DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
