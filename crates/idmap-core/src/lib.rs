//! Core abstractions for idmap-rs.
//!
//! This crate provides the renderer-independent parts of id-buffer picking:
//! - [`encode`] / [`decode`] between [`PickId`]s and [`IdColor`]s
//! - [`IdAllocator`] for unique, recyclable ids
//! - [`Registry`], the bijective object <-> id map
//! - [`PickResolver`] for turning a screen point into a registered object
//! - [`SurfacePainter`] and [`IdBufferSource`], the renderer capabilities consumed

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod allocator;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod options;
pub mod pick;
pub mod registry;
pub mod surface;

pub use allocator::IdAllocator;
pub use buffer::CpuIdBuffer;
pub use codec::{decode, decode_normalized, encode, IdColor, PickId, ID_BITS, ID_SPACE};
pub use error::{IdMapError, Result};
pub use options::{IdMapOptions, DEFAULT_BUFFER_NAME};
pub use pick::{remap_to_buffer, IdBuffer, IdBufferSource, PickHit, PickResolver};
pub use registry::Registry;
pub use surface::SurfacePainter;

// Re-export glam types for convenience
pub use glam::{UVec2, Vec2, Vec4};
