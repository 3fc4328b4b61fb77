//! Screen-space pick resolution.
//!
//! The id buffer is an offscreen image where every pixel holds the encoded id
//! of the object drawn there. A pick remaps the screen point into buffer
//! pixels, reads that pixel, decodes it and looks the id up in the registry.

use std::collections::HashMap;
use std::hash::Hash;

use glam::{UVec2, Vec2};

use crate::codec::{decode, IdColor, PickId};
use crate::error::{IdMapError, Result};
use crate::options::IdMapOptions;
use crate::registry::Registry;

/// A readable 2D id buffer.
pub trait IdBuffer {
    /// Returns the buffer size in pixels.
    fn size(&self) -> UVec2;

    /// Reads the color at pixel `(x, y)`.
    fn read_pixel(&self, x: u32, y: u32) -> Result<IdColor>;
}

/// Provides named id buffers, typically owned by the renderer.
pub trait IdBufferSource {
    /// The buffer type handed out.
    type Buffer: IdBuffer;

    /// Returns the buffer registered under `name`, if it exists this frame.
    fn id_buffer(&self, name: &str) -> Option<&Self::Buffer>;
}

impl<B: IdBuffer> IdBufferSource for HashMap<String, B> {
    type Buffer = B;

    fn id_buffer(&self, name: &str) -> Option<&B> {
        self.get(name)
    }
}

/// Result of a successful pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickHit<'a, H> {
    /// The decoded id.
    pub id: PickId,
    /// The object owning the id.
    pub object: &'a H,
    /// The buffer pixel that was sampled.
    pub pixel: UVec2,
}

/// Remaps a screen point into id-buffer pixel coordinates.
///
/// Each axis is scaled by `buffer_size / screen_size` and floored. Points that
/// land outside the buffer are an error, never clamped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn remap_to_buffer(
    screen_point: Vec2,
    screen_size: UVec2,
    buffer_size: UVec2,
) -> Result<UVec2> {
    if screen_size.x == 0 || screen_size.y == 0 {
        return Err(IdMapError::InvalidScreenSize {
            width: screen_size.x,
            height: screen_size.y,
        });
    }

    let scale = |p: f32, buffer: u32, screen: u32| {
        (f64::from(p) * f64::from(buffer) / f64::from(screen)).floor()
    };
    let x = scale(screen_point.x, buffer_size.x, screen_size.x);
    let y = scale(screen_point.y, buffer_size.y, screen_size.y);

    let inside = |v: f64, extent: u32| v.is_finite() && v >= 0.0 && v < f64::from(extent);
    if !inside(x, buffer_size.x) || !inside(y, buffer_size.y) {
        return Err(IdMapError::OutOfBounds {
            x: x as i64,
            y: y as i64,
            width: buffer_size.x,
            height: buffer_size.y,
        });
    }

    Ok(UVec2::new(x as u32, y as u32))
}

/// Resolves screen points to registered objects through a named id buffer.
#[derive(Debug, Clone)]
pub struct PickResolver {
    buffer_name: String,
    screen_size: UVec2,
    flip_y: bool,
}

impl PickResolver {
    /// Creates a resolver reading `buffer_name`, with input points expressed
    /// in a `screen_size` viewport.
    pub fn new(buffer_name: impl Into<String>, screen_size: UVec2) -> Self {
        Self {
            buffer_name: buffer_name.into(),
            screen_size,
            flip_y: false,
        }
    }

    /// Creates a resolver from options.
    pub fn from_options(options: &IdMapOptions, screen_size: UVec2) -> Self {
        Self {
            flip_y: options.flip_y,
            ..Self::new(options.buffer_name.clone(), screen_size)
        }
    }

    /// Returns the name of the id buffer read by this resolver.
    pub fn buffer_name(&self) -> &str {
        &self.buffer_name
    }

    /// Returns the viewport size input points are expressed in.
    pub fn screen_size(&self) -> UVec2 {
        self.screen_size
    }

    /// Sets the viewport size, e.g. after a window resize.
    pub fn set_screen_size(&mut self, screen_size: UVec2) {
        self.screen_size = screen_size;
    }

    /// Returns whether sampled rows are flipped.
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Sets whether sampled rows are flipped.
    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.flip_y = flip_y;
    }

    /// Reads and decodes the id under `screen_point`.
    ///
    /// Returns the sampled buffer pixel together with the decoded id, which
    /// may be [`PickId::BACKGROUND`].
    pub fn sample<S: IdBufferSource>(
        &self,
        source: &S,
        screen_point: Vec2,
    ) -> Result<(UVec2, PickId)> {
        let buffer = source
            .id_buffer(&self.buffer_name)
            .ok_or_else(|| IdMapError::BufferUnavailable(self.buffer_name.clone()))?;

        let size = buffer.size();
        if size.x == 0 || size.y == 0 {
            return Err(IdMapError::BufferUnavailable(self.buffer_name.clone()));
        }

        let mut pixel = remap_to_buffer(screen_point, self.screen_size, size)?;
        if self.flip_y {
            pixel.y = size.y - 1 - pixel.y;
        }

        let color = buffer.read_pixel(pixel.x, pixel.y)?;
        Ok((pixel, decode(color)))
    }

    /// Resolves `screen_point` to the registered object drawn there.
    ///
    /// Returns `Ok(None)` for background pixels and for ids with no live entry.
    pub fn resolve_hit<'r, S, H>(
        &self,
        source: &S,
        registry: &'r Registry<H>,
        screen_point: Vec2,
    ) -> Result<Option<PickHit<'r, H>>>
    where
        S: IdBufferSource,
        H: Eq + Hash + Clone,
    {
        let (pixel, id) = self.sample(source, screen_point)?;
        if id.is_background() {
            return Ok(None);
        }

        let Some(object) = registry.lookup(id) else {
            log::warn!("pick id {id} at pixel ({}, {}) is not registered", pixel.x, pixel.y);
            return Ok(None);
        };

        log::debug!("picked id {id} at pixel ({}, {})", pixel.x, pixel.y);
        Ok(Some(PickHit { id, object, pixel }))
    }

    /// Resolves `screen_point` to the registered object drawn there.
    pub fn resolve<'r, S, H>(
        &self,
        source: &S,
        registry: &'r Registry<H>,
        screen_point: Vec2,
    ) -> Result<Option<&'r H>>
    where
        S: IdBufferSource,
        H: Eq + Hash + Clone,
    {
        Ok(self
            .resolve_hit(source, registry, screen_point)?
            .map(|hit| hit.object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CpuIdBuffer;
    use crate::codec::encode;
    use crate::surface::SurfacePainter;

    /// Painter where every object has a single surface.
    struct OneSurfaceEach;

    impl SurfacePainter for OneSurfaceEach {
        type Object = &'static str;
        type Surface = ();

        fn drawable_surfaces(&self, _object: &&'static str, _include_children: bool) -> Vec<()> {
            vec![()]
        }

        fn set_surface_color(&mut self, _surfaces: &[()], _color: IdColor) {}
    }

    fn source_with(buffer: CpuIdBuffer) -> HashMap<String, CpuIdBuffer> {
        HashMap::from([("ids".to_string(), buffer)])
    }

    #[test]
    fn test_remap_scaling() {
        let pixel =
            remap_to_buffer(Vec2::new(150.0, 80.0), UVec2::new(200, 100), UVec2::new(100, 50))
                .unwrap();
        assert_eq!(pixel, UVec2::new(75, 40));
    }

    #[test]
    fn test_remap_truncates() {
        let pixel =
            remap_to_buffer(Vec2::new(3.9, 1.99), UVec2::new(10, 10), UVec2::new(10, 10)).unwrap();
        assert_eq!(pixel, UVec2::new(3, 1));

        let pixel =
            remap_to_buffer(Vec2::new(199.9, 99.9), UVec2::new(200, 100), UVec2::new(100, 50))
                .unwrap();
        assert_eq!(pixel, UVec2::new(99, 49));
    }

    #[test]
    fn test_remap_out_of_bounds_not_clamped() {
        let screen = UVec2::new(200, 100);
        let buffer = UVec2::new(100, 50);
        assert!(matches!(
            remap_to_buffer(Vec2::new(200.0, 10.0), screen, buffer),
            Err(IdMapError::OutOfBounds { x: 100, y: 5, width: 100, height: 50 })
        ));
        assert!(matches!(
            remap_to_buffer(Vec2::new(-1.0, 10.0), screen, buffer),
            Err(IdMapError::OutOfBounds { x: -1, .. })
        ));
        assert!(matches!(
            remap_to_buffer(Vec2::new(f32::NAN, 10.0), screen, buffer),
            Err(IdMapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_remap_zero_screen() {
        assert!(matches!(
            remap_to_buffer(Vec2::ZERO, UVec2::new(0, 10), UVec2::new(10, 10)),
            Err(IdMapError::InvalidScreenSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_resolve_hit_and_miss() {
        let mut painter = OneSurfaceEach;
        let mut registry = Registry::new();
        let cube = registry.register(&"cube", true, &mut painter).unwrap();
        let sphere = registry.register(&"sphere", true, &mut painter).unwrap();
        registry.unregister(&"sphere").unwrap();

        let mut buffer = CpuIdBuffer::new(100, 50);
        buffer.set_pixel(75, 40, encode(cube)).unwrap();
        buffer.set_pixel(10, 10, encode(sphere)).unwrap();
        buffer.set_pixel(20, 20, encode(PickId::new(4242).unwrap())).unwrap();
        let source = source_with(buffer);

        let resolver = PickResolver::new("ids", UVec2::new(200, 100));
        let hit = resolver
            .resolve_hit(&source, &registry, Vec2::new(150.0, 80.0))
            .unwrap()
            .unwrap();
        assert_eq!(hit.id, cube);
        assert_eq!(*hit.object, "cube");
        assert_eq!(hit.pixel, UVec2::new(75, 40));

        // Background, unregistered and never-registered ids are all misses
        for point in [Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0), Vec2::new(40.0, 40.0)] {
            assert_eq!(resolver.resolve(&source, &registry, point).unwrap(), None);
        }
    }

    #[test]
    fn test_buffer_unavailable() {
        let registry: Registry<&str> = Registry::new();
        let resolver = PickResolver::new("missing", UVec2::new(10, 10));
        let source = source_with(CpuIdBuffer::new(10, 10));
        assert!(matches!(
            resolver.resolve(&source, &registry, Vec2::ZERO),
            Err(IdMapError::BufferUnavailable(name)) if name == "missing"
        ));

        let resolver = PickResolver::new("ids", UVec2::new(10, 10));
        let empty = source_with(CpuIdBuffer::new(0, 0));
        assert!(matches!(
            resolver.resolve(&empty, &registry, Vec2::ZERO),
            Err(IdMapError::BufferUnavailable(_))
        ));
    }

    #[test]
    fn test_flip_y() {
        let mut painter = OneSurfaceEach;
        let mut registry = Registry::new();
        let id = registry.register(&"top", true, &mut painter).unwrap();

        let mut buffer = CpuIdBuffer::new(4, 4);
        buffer.set_pixel(1, 3, encode(id)).unwrap();
        let source = source_with(buffer);

        let mut resolver = PickResolver::from_options(
            &IdMapOptions {
                buffer_name: "ids".to_string(),
                flip_y: true,
                ..IdMapOptions::default()
            },
            UVec2::new(4, 4),
        );
        assert!(resolver.flip_y());
        assert_eq!(
            resolver.resolve(&source, &registry, Vec2::new(1.5, 0.5)).unwrap(),
            Some(&"top")
        );

        resolver.set_flip_y(false);
        assert_eq!(resolver.resolve(&source, &registry, Vec2::new(1.5, 0.5)).unwrap(), None);
    }
}
