//! idmap-rs: GPU id-buffer object picking.
//!
//! Every registered scene object gets a unique 24-bit id, painted onto its
//! surfaces as a flat color. The renderer draws those colors into an offscreen
//! id buffer; picking reads the pixel under the cursor and decodes it back to
//! the object.
//!
//! # Quick Start
//!
//! ```no_run
//! use idmap::*;
//!
//! # fn run<R>(renderer: R, entity: R::Object) -> Result<()>
//! # where
//! #     R: SurfacePainter + IdBufferSource,
//! #     R::Object: Eq + std::hash::Hash + Clone,
//! # {
//! init_logging();
//!
//! let mut map = IdMap::new(renderer, UVec2::new(1280, 720));
//! let id = map.register_default(&entity)?;
//!
//! // ... render the id pass ...
//!
//! if let Some(selected) = map.get_selected(Vec2::new(640.0, 360.0))? {
//!     assert!(map.id_of(selected) == Some(id));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - `idmap-core`: codec, allocator, registry and pick resolution
//! - `idmap-render`: wgpu id buffer with pixel readback

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod id_map;

pub use id_map::IdMap;

// Re-export core types
pub use idmap_core::{
    decode, decode_normalized, encode, remap_to_buffer, CpuIdBuffer, IdAllocator, IdBuffer,
    IdBufferSource, IdColor, IdMapError, IdMapOptions, PickHit, PickId, PickResolver, Registry,
    Result, SurfacePainter, UVec2, Vec2, Vec4, DEFAULT_BUFFER_NAME, ID_BITS, ID_SPACE,
};

// Re-export render types
pub use idmap_render::{
    id_color_target, id_depth_stencil, GpuContext, GpuIdBuffer, GpuIdBuffers, IdColorUniforms,
    RenderError, ID_BUFFER_FORMAT, ID_DEPTH_FORMAT,
};

/// Initializes `env_logger` for the process.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("idmap-rs logging initialized");
}
