//! Pick id <-> color encoding.
//!
//! An id occupies the low 24 bits of an RGBA8 color:
//! - R contains bits 0-7
//! - G contains bits 8-15
//! - B contains bits 16-23
//!
//! Alpha is always 255 and carries no id bits. The id buffer is cleared to
//! black, which decodes to [`PickId::BACKGROUND`].

use std::fmt;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{IdMapError, Result};

/// Number of id bits carried by a color.
pub const ID_BITS: u32 = 24;

/// Number of distinct ids representable in a color (2^24).
pub const ID_SPACE: u32 = 1 << ID_BITS;

/// A 24-bit object id as written into the id buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PickId(u32);

impl PickId {
    /// The id the cleared id buffer decodes to. Never handed out.
    pub const BACKGROUND: PickId = PickId(0);

    /// The largest representable id.
    pub const MAX: PickId = PickId(ID_SPACE - 1);

    /// Creates an id, rejecting values outside the 24-bit id space.
    pub fn new(raw: u32) -> Result<Self> {
        if raw < ID_SPACE {
            Ok(Self(raw))
        } else {
            Err(IdMapError::IdOutOfRange(raw))
        }
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns whether this is the background id.
    #[must_use]
    pub const fn is_background(self) -> bool {
        self.0 == 0
    }

    /// Masks a raw value into the id space. Only for values known to be in range.
    pub(crate) const fn from_masked(raw: u32) -> Self {
        Self(raw & (ID_SPACE - 1))
    }
}

impl fmt::Display for PickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl TryFrom<u32> for PickId {
    type Error = IdMapError;

    fn try_from(raw: u32) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<PickId> for u32 {
    fn from(id: PickId) -> Self {
        id.0
    }
}

/// An RGBA8 color as stored in the id buffer.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct IdColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl IdColor {
    /// The id buffer clear color.
    pub const BACKGROUND: IdColor = IdColor::new(0, 0, 0, 255);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from `[r, g, b, a]` bytes, as read back from an
    /// `Rgba8Unorm` texture.
    #[must_use]
    pub const fn from_rgba(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Returns the channels as `[r, g, b, a]` bytes.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the color with each channel normalized to `[0, 1]`.
    ///
    /// This is the form a shader property or uniform expects.
    #[must_use]
    pub fn to_normalized(self) -> Vec4 {
        Vec4::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }

    /// Converts a normalized color back to bytes.
    ///
    /// Each channel is scaled by 255 and truncated, not rounded, so that
    /// `from_normalized(c.to_normalized()) == c` for every byte value.
    /// Out-of-range channels saturate to `0` or `255`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_normalized(color: Vec4) -> Self {
        let channel = |c: f32| (c * 255.0) as u8;
        Self::new(
            channel(color.x),
            channel(color.y),
            channel(color.z),
            channel(color.w),
        )
    }
}

/// Encodes a pick id as an opaque color.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode(id: PickId) -> IdColor {
    let raw = id.get();
    IdColor::new(
        (raw & 0xFF) as u8,
        ((raw >> 8) & 0xFF) as u8,
        ((raw >> 16) & 0xFF) as u8,
        255,
    )
}

/// Decodes a color back to a pick id. Alpha is ignored.
#[must_use]
pub fn decode(color: IdColor) -> PickId {
    PickId::from_masked(
        u32::from(color.r) | (u32::from(color.g) << 8) | (u32::from(color.b) << 16),
    )
}

/// Decodes a color whose channels are normalized to `[0, 1]`.
#[must_use]
pub fn decode_normalized(color: Vec4) -> PickId {
    decode(IdColor::from_normalized(color))
}
