//! Registry mapping scene objects to pick ids.

use std::collections::HashMap;
use std::hash::Hash;

use crate::allocator::IdAllocator;
use crate::codec::{encode, PickId};
use crate::error::{IdMapError, Result};
use crate::surface::SurfacePainter;

/// Bijective map between scene objects and pick ids.
///
/// Each registered object owns exactly one live id and each live id maps back
/// to exactly one object. Both directions are updated together, after every
/// fallible step of an operation has succeeded.
#[derive(Debug, Clone)]
pub struct Registry<H> {
    /// Map from id -> object
    by_id: HashMap<PickId, H>,
    /// Map from object -> id
    by_object: HashMap<H, PickId>,
    allocator: IdAllocator,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_object: HashMap::new(),
            allocator: IdAllocator::new(),
        }
    }
}

impl<H: Eq + Hash + Clone> Registry<H> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that draws ids from `allocator`.
    pub fn with_allocator(allocator: IdAllocator) -> Self {
        Self {
            allocator,
            ..Self::default()
        }
    }

    /// Registers an object and paints its surfaces with the encoded id.
    ///
    /// Returns an error if the object is already registered, if `painter`
    /// finds no drawable surfaces, or if the id space is exhausted. Nothing
    /// is allocated or painted on failure.
    pub fn register<P>(
        &mut self,
        object: &H,
        include_children: bool,
        painter: &mut P,
    ) -> Result<PickId>
    where
        P: SurfacePainter<Object = H>,
    {
        if self.by_object.contains_key(object) {
            return Err(IdMapError::AlreadyRegistered);
        }

        let surfaces = painter.drawable_surfaces(object, include_children);
        if surfaces.is_empty() {
            return Err(IdMapError::NoVisualRepresentation);
        }

        let id = self.allocator.allocate()?;
        painter.set_surface_color(&surfaces, encode(id));

        self.by_id.insert(id, object.clone());
        self.by_object.insert(object.clone(), id);
        log::debug!("registered pick id {id} ({} surfaces)", surfaces.len());
        Ok(id)
    }

    /// Unregisters an object and returns its id to the recycle pool.
    ///
    /// The object's surfaces keep their last painted color.
    pub fn unregister(&mut self, object: &H) -> Result<PickId> {
        let id = self
            .by_object
            .remove(object)
            .ok_or(IdMapError::NotRegistered)?;
        self.by_id.remove(&id);
        self.allocator.release(id);
        log::debug!("unregistered pick id {id}");
        Ok(id)
    }

    /// Looks up the object owning `id`.
    pub fn lookup(&self, id: PickId) -> Option<&H> {
        self.by_id.get(&id)
    }

    /// Returns the id owned by `object`, if registered.
    pub fn id_of(&self, object: &H) -> Option<PickId> {
        self.by_object.get(object).copied()
    }

    /// Checks if an object is registered.
    pub fn contains(&self, object: &H) -> bool {
        self.by_object.contains_key(object)
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no object is registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Returns an iterator over all `(id, object)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (PickId, &H)> {
        self.by_id.iter().map(|(&id, object)| (id, object))
    }

    /// Unregisters every object, releasing all ids.
    ///
    /// Ids are released in ascending order, so they are reused lowest first.
    pub fn clear(&mut self) {
        let mut ids: Vec<PickId> = self.by_id.drain().map(|(id, _)| id).collect();
        ids.sort_unstable();
        for id in ids {
            self.allocator.release(id);
        }
        self.by_object.clear();
    }

    /// Returns the underlying id allocator.
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }
}
