//! Rendering error types.

use idmap_core::IdMapError;
use thiserror::Error;

/// Errors that can occur in the GPU backend.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// The id buffer textures have not been created yet.
    #[error("id buffer '{0}' has no textures; call resize() first")]
    NotInitialized(String),

    /// Mapping the staging buffer failed.
    #[error("staging buffer map failed: {0}")]
    MapFailed(#[from] wgpu::BufferAsyncError),

    /// The map callback was dropped without reporting.
    #[error("staging buffer map callback never ran")]
    MapCallbackDropped,

    /// Pixel data does not match the texture size.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for IdMapError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NotInitialized(name) => IdMapError::BufferUnavailable(name),
            other => IdMapError::Readback(other.to_string()),
        }
    }
}
