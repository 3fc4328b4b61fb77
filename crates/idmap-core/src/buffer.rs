//! CPU-side id buffer.

use glam::UVec2;

use crate::codec::IdColor;
use crate::error::{IdMapError, Result};
use crate::pick::IdBuffer;

/// An id buffer held in host memory, row-major with row 0 first.
///
/// Useful when the host reads the whole id texture back once per frame, and
/// as a stand-in for a GPU buffer in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuIdBuffer {
    width: u32,
    height: u32,
    pixels: Vec<IdColor>,
}

impl CpuIdBuffer {
    /// Creates a buffer cleared to the background color.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![IdColor::BACKGROUND; width as usize * height as usize],
        }
    }

    /// Creates a buffer from tightly packed RGBA8 bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(IdMapError::Readback(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                bytes.len()
            )));
        }
        let pixels = bytemuck::cast_slice::<u8, IdColor>(bytes).to_vec();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Writes one pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: IdColor) -> Result<()> {
        let index = self.index(x, y)?;
        self.pixels[index] = color;
        Ok(())
    }

    /// Fills the rectangle `[min, max)` (clipped to the buffer) with `color`.
    pub fn fill_rect(&mut self, min: UVec2, max: UVec2, color: IdColor) {
        let max = max.min(UVec2::new(self.width, self.height));
        for y in min.y..max.y {
            for x in min.x..max.x {
                self.pixels[y as usize * self.width as usize + x as usize] = color;
            }
        }
    }

    /// Resets every pixel to the background color.
    pub fn clear(&mut self) {
        self.pixels.fill(IdColor::BACKGROUND);
    }

    /// Returns the raw pixels.
    pub fn pixels(&self) -> &[IdColor] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(IdMapError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}

impl IdBuffer for CpuIdBuffer {
    fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn read_pixel(&self, x: u32, y: u32) -> Result<IdColor> {
        Ok(self.pixels[self.index(x, y)?])
    }
}
