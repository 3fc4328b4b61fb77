//! Error types for idmap-rs.

use thiserror::Error;

/// The main error type for idmap-rs operations.
#[derive(Error, Debug)]
pub enum IdMapError {
    /// The object already owns a live pick id.
    #[error("object is already registered")]
    AlreadyRegistered,

    /// The object does not own a pick id.
    #[error("object is not registered")]
    NotRegistered,

    /// The renderer reported no drawable surfaces for the object.
    #[error("object has no drawable surfaces")]
    NoVisualRepresentation,

    /// The named id buffer could not be read this frame.
    #[error("id buffer '{0}' is unavailable")]
    BufferUnavailable(String),

    /// Every id in the 24-bit id space is live.
    #[error("pick id space exhausted (2^24 ids)")]
    IdSpaceExhausted,

    /// A raw value does not fit in the 24-bit id space.
    #[error("pick id {0} is outside the 24-bit id space")]
    IdOutOfRange(u32),

    /// A remapped screen point falls outside the id buffer.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} id buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// The screen size used for remapping has a zero axis.
    #[error("invalid screen size {width}x{height}")]
    InvalidScreenSize { width: u32, height: u32 },

    /// Reading a pixel back from the id buffer failed.
    #[error("id buffer readback failed: {0}")]
    Readback(String),

    /// Invalid configuration value.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for idmap-rs operations.
pub type Result<T> = std::result::Result<T, IdMapError>;
