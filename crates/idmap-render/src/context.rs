//! Device/queue ownership for id buffers.

use std::sync::Arc;

use crate::error::{RenderError, RenderResult};

/// A shared wgpu device and queue.
#[derive(Debug, Clone)]
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Wraps an existing device and queue.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    /// Creates a context without a window surface.
    ///
    /// Blocks until the adapter and device are available.
    pub fn new_headless() -> RenderResult<Self> {
        pollster::block_on(Self::new_headless_async())
    }

    async fn new_headless_async() -> RenderResult<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok_or(RenderError::AdapterCreationFailed)?;

        log::info!("id buffer adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("idmap device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }
}
