//! wgpu backend for idmap-rs.
//!
//! This crate provides the GPU side of id-buffer picking:
//! - [`GpuIdBuffer`], an `Rgba8Unorm` render target with single-pixel readback
//! - [`IdColorUniforms`] for binding an object's encoded id to a shader
//! - Pipeline state helpers for the id pass
//! - [`GpuContext`] for device/queue ownership, including headless creation

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod error;
pub mod id_buffer;
pub mod pick;

pub use context::GpuContext;
pub use error::{RenderError, RenderResult};
pub use id_buffer::{GpuIdBuffer, GpuIdBuffers};
pub use pick::{id_color_target, id_depth_stencil, IdColorUniforms, ID_BUFFER_FORMAT, ID_DEPTH_FORMAT};
