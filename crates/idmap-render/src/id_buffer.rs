//! Id buffer render target with single-pixel readback.

use std::collections::HashMap;

use glam::UVec2;
use idmap_core::{CpuIdBuffer, IdBuffer, IdColor};

use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};
use crate::pick::{ID_BUFFER_FORMAT, ID_DEPTH_FORMAT};

/// Row pitch of the readback copy. Copies must be aligned to 256 bytes.
const READBACK_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Named GPU id buffers, usable directly as an [`idmap_core::IdBufferSource`].
pub type GpuIdBuffers = HashMap<String, GpuIdBuffer>;

/// Offscreen id texture, its depth attachment and a staging buffer.
pub struct GpuIdBuffer {
    label: String,
    ctx: GpuContext,
    texture: Option<wgpu::Texture>,
    texture_view: Option<wgpu::TextureView>,
    #[allow(dead_code)]
    depth_texture: Option<wgpu::Texture>,
    depth_view: Option<wgpu::TextureView>,
    staging_buffer: Option<wgpu::Buffer>,
    size: (u32, u32),
}

impl GpuIdBuffer {
    /// Creates an id buffer with no textures. Call [`resize`](Self::resize)
    /// before rendering into it.
    pub fn new(ctx: GpuContext, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ctx,
            texture: None,
            texture_view: None,
            depth_texture: None,
            depth_view: None,
            staging_buffer: None,
            size: (0, 0),
        }
    }

    /// Returns the label used for the buffer's GPU resources.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Creates or recreates the textures to match the render size.
    pub fn resize(&mut self, width: u32, height: u32) {
        // Skip if size unchanged
        if self.size == (width, height) && self.texture.is_some() {
            return;
        }
        if width == 0 || height == 0 {
            self.release();
            return;
        }

        let device = &self.ctx.device;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{} texture", self.label)),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ID_BUFFER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{} depth", self.label)),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ID_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // One aligned row is enough for a single RGBA8 pixel
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} staging", self.label)),
            size: u64::from(READBACK_ROW_BYTES),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        log::debug!("id buffer '{}' resized to {width}x{height}", self.label);

        self.texture = Some(texture);
        self.texture_view = Some(texture_view);
        self.depth_texture = Some(depth_texture);
        self.depth_view = Some(depth_view);
        self.staging_buffer = Some(staging_buffer);
        self.size = (width, height);
    }

    /// Drops the GPU resources. Reads fail until the next resize.
    pub fn release(&mut self) {
        self.texture = None;
        self.texture_view = None;
        self.depth_texture = None;
        self.depth_view = None;
        self.staging_buffer = None;
        self.size = (0, 0);
    }

    /// Returns the id texture view for external rendering.
    pub fn texture_view(&self) -> Option<&wgpu::TextureView> {
        self.texture_view.as_ref()
    }

    /// Returns the depth view for external rendering.
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_view.as_ref()
    }

    /// Begins an id render pass that clears color to black and depth to 1.
    ///
    /// The caller draws every registered object into the returned pass with
    /// its id color and drops it to finish the pass.
    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> Option<wgpu::RenderPass<'a>> {
        let view = self.texture_view.as_ref()?;
        let depth = self.depth_view.as_ref()?;

        Some(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Id Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK), // Background = id 0
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        }))
    }

    /// Uploads a CPU id buffer of the same size into the texture.
    pub fn write_pixels(&self, pixels: &CpuIdBuffer) -> RenderResult<()> {
        let texture = self.texture()?;
        let (width, height) = self.size;
        if pixels.size() != UVec2::new(width, height) {
            return Err(RenderError::SizeMismatch {
                expected: width as usize * height as usize,
                actual: pixels.pixels().len(),
            });
        }

        self.ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(pixels.pixels()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    /// Copies pixel `(x, y)` to the staging buffer and waits for it.
    fn read_back(&self, x: u32, y: u32) -> RenderResult<IdColor> {
        let texture = self.texture()?;
        let staging_buffer = self
            .staging_buffer
            .as_ref()
            .ok_or_else(|| RenderError::NotInitialized(self.label.clone()))?;

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Id Readback Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(READBACK_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..4);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = self.ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| RenderError::MapCallbackDropped)??;

        let data = buffer_slice.get_mapped_range();
        let pixel = IdColor::from_rgba([data[0], data[1], data[2], data[3]]);
        drop(data);
        staging_buffer.unmap();

        Ok(pixel)
    }

    fn texture(&self) -> RenderResult<&wgpu::Texture> {
        self.texture
            .as_ref()
            .ok_or_else(|| RenderError::NotInitialized(self.label.clone()))
    }
}

impl IdBuffer for GpuIdBuffer {
    fn size(&self) -> UVec2 {
        UVec2::new(self.size.0, self.size.1)
    }

    fn read_pixel(&self, x: u32, y: u32) -> idmap_core::Result<IdColor> {
        let (width, height) = self.size;
        if x >= width || y >= height {
            return Err(idmap_core::IdMapError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width,
                height,
            });
        }
        Ok(self.read_back(x, y)?)
    }
}
