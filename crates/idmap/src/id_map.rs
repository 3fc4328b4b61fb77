//! The id map: registration plus picking over one renderer.

use std::hash::Hash;

use glam::{UVec2, Vec2};
use idmap_core::{
    IdAllocator, IdBufferSource, IdMapOptions, PickHit, PickId, PickResolver, Registry, Result,
    SurfacePainter,
};

/// Assigns pick ids to scene objects and resolves screen points back to them.
///
/// The renderer paints registered objects' surfaces with their id color and
/// exposes the id buffer those surfaces are drawn into.
///
/// # Example
///
/// ```no_run
/// use idmap::*;
///
/// fn pick<R>(map: &IdMap<R>, cursor: Vec2) -> Result<()>
/// where
///     R: SurfacePainter + IdBufferSource,
///     R::Object: Eq + std::hash::Hash + Clone + std::fmt::Debug,
/// {
///     if let Some(object) = map.get_selected(cursor)? {
///         println!("selected {object:?}");
///     }
///     Ok(())
/// }
/// ```
pub struct IdMap<R>
where
    R: SurfacePainter,
{
    renderer: R,
    registry: Registry<R::Object>,
    resolver: PickResolver,
    options: IdMapOptions,
}

impl<R> IdMap<R>
where
    R: SurfacePainter + IdBufferSource,
    R::Object: Eq + Hash + Clone,
{
    /// Creates an id map with default options.
    pub fn new(renderer: R, screen_size: UVec2) -> Self {
        let options = IdMapOptions::default();
        Self {
            renderer,
            registry: Registry::new(),
            resolver: PickResolver::from_options(&options, screen_size),
            options,
        }
    }

    /// Creates an id map with the given options.
    ///
    /// Returns an error if the options are invalid.
    pub fn with_options(renderer: R, screen_size: UVec2, options: IdMapOptions) -> Result<Self> {
        options.validate()?;
        let allocator = IdAllocator::with_first_id(options.first_id)?;
        log::info!(
            "id map using buffer '{}' (first id {})",
            options.buffer_name,
            options.first_id
        );
        Ok(Self {
            renderer,
            registry: Registry::with_allocator(allocator),
            resolver: PickResolver::from_options(&options, screen_size),
            options,
        })
    }

    /// Registers an object, painting its surfaces (and its descendants'
    /// surfaces when `include_children` is set) with a fresh id color.
    pub fn register(&mut self, object: &R::Object, include_children: bool) -> Result<PickId> {
        self.registry
            .register(object, include_children, &mut self.renderer)
    }

    /// Registers an object using the configured `include_children` default.
    pub fn register_default(&mut self, object: &R::Object) -> Result<PickId> {
        self.register(object, self.options.include_children)
    }

    /// Unregisters an object and recycles its id.
    pub fn unregister(&mut self, object: &R::Object) -> Result<PickId> {
        self.registry.unregister(object)
    }

    /// Returns the object drawn under `screen_point`, if any.
    pub fn get_selected(&self, screen_point: Vec2) -> Result<Option<&R::Object>> {
        self.resolver
            .resolve(&self.renderer, &self.registry, screen_point)
    }

    /// Like [`get_selected`](Self::get_selected), also reporting the id and
    /// the sampled buffer pixel.
    pub fn pick(&self, screen_point: Vec2) -> Result<Option<PickHit<'_, R::Object>>> {
        self.resolver
            .resolve_hit(&self.renderer, &self.registry, screen_point)
    }

    /// Looks up the object owning `id`.
    pub fn lookup(&self, id: PickId) -> Option<&R::Object> {
        self.registry.lookup(id)
    }

    /// Returns the id owned by `object`, if registered.
    pub fn id_of(&self, object: &R::Object) -> Option<PickId> {
        self.registry.id_of(object)
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if no object is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Returns an iterator over all `(id, object)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (PickId, &R::Object)> {
        self.registry.iter()
    }

    /// Unregisters every object.
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Sets the viewport size pick points are expressed in.
    pub fn set_screen_size(&mut self, screen_size: UVec2) {
        self.resolver.set_screen_size(screen_size);
    }

    /// Returns the viewport size pick points are expressed in.
    pub fn screen_size(&self) -> UVec2 {
        self.resolver.screen_size()
    }

    /// Returns the options this map was created with.
    pub fn options(&self) -> &IdMapOptions {
        &self.options
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Registry<R::Object> {
        &self.registry
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably, e.g. to render the id pass or resize buffers.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
