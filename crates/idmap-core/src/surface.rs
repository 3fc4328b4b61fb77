//! Renderer capability used when registering objects.

use crate::codec::IdColor;

/// Discovers and paints the drawable surfaces of scene objects.
///
/// Implemented by the host renderer. The registry calls
/// [`drawable_surfaces`](Self::drawable_surfaces) once per registration and
/// then hands every returned surface to
/// [`set_surface_color`](Self::set_surface_color) together with the encoded id.
pub trait SurfacePainter {
    /// The scene object type the registry keys on.
    type Object;

    /// A handle to one drawable surface (mesh renderer, draw call, ...).
    type Surface;

    /// Returns the drawable surfaces of `object`.
    ///
    /// With `include_children` the object's whole subtree is searched,
    /// otherwise only the object itself.
    fn drawable_surfaces(&self, object: &Self::Object, include_children: bool)
        -> Vec<Self::Surface>;

    /// Writes `color` into the id-pass color property of every surface.
    fn set_surface_color(&mut self, surfaces: &[Self::Surface], color: IdColor);
}
