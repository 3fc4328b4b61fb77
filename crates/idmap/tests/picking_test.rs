//! End-to-end picking tests against an in-memory scene.
//!
//! The scene stands in for a renderer: entities own meshes and children,
//! meshes cover a screen rectangle, and `render` rasterizes every painted
//! mesh into the id buffer.

use std::collections::HashMap;

use idmap::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Entity(u32);

#[derive(Default)]
struct Node {
    meshes: Vec<usize>,
    children: Vec<Entity>,
}

struct Mesh {
    min: UVec2,
    max: UVec2,
    color: Option<IdColor>,
}

struct Scene {
    nodes: HashMap<Entity, Node>,
    meshes: Vec<Mesh>,
    buffers: HashMap<String, CpuIdBuffer>,
    buffer_size: UVec2,
}

impl Scene {
    fn new(buffer_size: UVec2) -> Self {
        Self {
            nodes: HashMap::new(),
            meshes: Vec::new(),
            buffers: HashMap::new(),
            buffer_size,
        }
    }

    fn spawn(&mut self, entity: Entity, parent: Option<Entity>) {
        self.nodes.entry(entity).or_default();
        if let Some(parent) = parent {
            self.nodes.entry(parent).or_default().children.push(entity);
        }
    }

    fn add_mesh(&mut self, entity: Entity, min: UVec2, max: UVec2) {
        self.meshes.push(Mesh {
            min,
            max,
            color: None,
        });
        let index = self.meshes.len() - 1;
        self.nodes.entry(entity).or_default().meshes.push(index);
    }

    /// Draws every painted mesh, later meshes on top.
    fn render(&mut self) {
        let mut buffer = CpuIdBuffer::new(self.buffer_size.x, self.buffer_size.y);
        for mesh in &self.meshes {
            if let Some(color) = mesh.color {
                buffer.fill_rect(mesh.min, mesh.max, color);
            }
        }
        self.buffers.insert(DEFAULT_BUFFER_NAME.to_string(), buffer);
    }

    fn collect(&self, entity: Entity, recursive: bool, out: &mut Vec<usize>) {
        let Some(node) = self.nodes.get(&entity) else {
            return;
        };
        out.extend(&node.meshes);
        if recursive {
            for &child in &node.children {
                self.collect(child, true, out);
            }
        }
    }
}

impl SurfacePainter for Scene {
    type Object = Entity;
    type Surface = usize;

    fn drawable_surfaces(&self, object: &Entity, include_children: bool) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect(*object, include_children, &mut out);
        out
    }

    fn set_surface_color(&mut self, surfaces: &[usize], color: IdColor) {
        for &index in surfaces {
            self.meshes[index].color = Some(color);
        }
    }
}

impl IdBufferSource for Scene {
    type Buffer = CpuIdBuffer;

    fn id_buffer(&self, name: &str) -> Option<&CpuIdBuffer> {
        self.buffers.get(name)
    }
}

const CAR: Entity = Entity(1);
const WHEEL: Entity = Entity(2);
const TREE: Entity = Entity(3);
const EMPTY: Entity = Entity(4);

/// A 100x50 id buffer behind a 200x100 screen.
fn street() -> Scene {
    let mut scene = Scene::new(UVec2::new(100, 50));
    scene.spawn(CAR, None);
    scene.spawn(WHEEL, Some(CAR));
    scene.spawn(TREE, None);
    scene.spawn(EMPTY, None);
    scene.add_mesh(CAR, UVec2::new(10, 10), UVec2::new(40, 30));
    scene.add_mesh(WHEEL, UVec2::new(12, 30), UVec2::new(18, 36));
    scene.add_mesh(TREE, UVec2::new(70, 5), UVec2::new(80, 45));
    scene
}

#[test]
fn test_register_and_select() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));

    let car = map.register_default(&CAR).unwrap();
    let tree = map.register(&TREE, true).unwrap();
    assert_eq!(car.get(), 1);
    assert_eq!(tree.get(), 2);
    map.renderer_mut().render();

    // Screen (150, 80) -> buffer (75, 40), inside the tree
    assert_eq!(map.get_selected(Vec2::new(150.0, 80.0)).unwrap(), Some(&TREE));

    // The wheel was painted with the car's id
    let hit = map.pick(Vec2::new(30.0, 66.0)).unwrap().unwrap();
    assert_eq!(hit.pixel, UVec2::new(15, 33));
    assert_eq!(hit.id, car);
    assert_eq!(*hit.object, CAR);

    // Background
    assert_eq!(map.get_selected(Vec2::new(2.0, 2.0)).unwrap(), None);
}

#[test]
fn test_register_without_children() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));
    map.register(&CAR, false).unwrap();
    map.renderer_mut().render();

    // The wheel stays unpainted and reads as background
    assert_eq!(map.get_selected(Vec2::new(30.0, 66.0)).unwrap(), None);
    assert_eq!(map.get_selected(Vec2::new(40.0, 40.0)).unwrap(), Some(&CAR));
}

#[test]
fn test_registration_errors() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));

    map.register_default(&CAR).unwrap();
    assert!(matches!(
        map.register_default(&CAR),
        Err(IdMapError::AlreadyRegistered)
    ));
    assert!(matches!(
        map.register_default(&EMPTY),
        Err(IdMapError::NoVisualRepresentation)
    ));
    assert!(matches!(
        map.unregister(&TREE),
        Err(IdMapError::NotRegistered)
    ));
    assert_eq!(map.len(), 1);
    assert_eq!(map.registry().allocator().next_fresh(), 2);
}

#[test]
fn test_unregistered_object_is_a_miss() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));
    map.register_default(&TREE).unwrap();
    map.renderer_mut().render();

    map.unregister(&TREE).unwrap();
    // The stale color is still in the buffer but no longer resolves
    assert_eq!(map.get_selected(Vec2::new(150.0, 80.0)).unwrap(), None);
    assert!(map.is_empty());
}

#[test]
fn test_recycled_id_resolves_to_new_owner() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));

    let car = map.register_default(&CAR).unwrap();
    map.unregister(&CAR).unwrap();
    let tree = map.register_default(&TREE).unwrap();
    assert_eq!(tree, car);
    map.renderer_mut().render();

    assert_eq!(map.lookup(tree), Some(&TREE));
    assert_eq!(map.id_of(&CAR), None);
    // Car meshes still carry the recycled color until repainted
    assert_eq!(map.get_selected(Vec2::new(40.0, 40.0)).unwrap(), Some(&TREE));
}

#[test]
fn test_buffer_unavailable_before_render() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));
    map.register_default(&CAR).unwrap();
    assert!(matches!(
        map.get_selected(Vec2::new(40.0, 40.0)),
        Err(IdMapError::BufferUnavailable(name)) if name == DEFAULT_BUFFER_NAME
    ));
}

#[test]
fn test_out_of_bounds_and_resize() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));
    map.register_default(&TREE).unwrap();
    map.renderer_mut().render();

    assert!(matches!(
        map.get_selected(Vec2::new(250.0, 10.0)),
        Err(IdMapError::OutOfBounds { .. })
    ));

    // Same buffer, larger window
    map.set_screen_size(UVec2::new(400, 200));
    assert_eq!(map.screen_size(), UVec2::new(400, 200));
    assert_eq!(map.get_selected(Vec2::new(300.0, 160.0)).unwrap(), Some(&TREE));

    map.set_screen_size(UVec2::ZERO);
    assert!(matches!(
        map.get_selected(Vec2::new(1.0, 1.0)),
        Err(IdMapError::InvalidScreenSize { .. })
    ));
}

#[test]
fn test_options() {
    let options = IdMapOptions::from_json_str(
        r#"{ "buffer_name": "selection", "include_children": false, "first_id": 10 }"#,
    )
    .unwrap();
    let mut map = IdMap::with_options(street(), UVec2::new(200, 100), options).unwrap();

    assert_eq!(map.register_default(&CAR).unwrap().get(), 10);
    map.renderer_mut().render();

    // The scene renders into the default buffer name only
    assert!(matches!(
        map.get_selected(Vec2::new(40.0, 40.0)),
        Err(IdMapError::BufferUnavailable(name)) if name == "selection"
    ));

    let bad = IdMapOptions {
        first_id: 0,
        ..IdMapOptions::default()
    };
    assert!(IdMap::with_options(street(), UVec2::new(200, 100), bad).is_err());
}

#[test]
fn test_clear_and_iter() {
    let mut map = IdMap::new(street(), UVec2::new(200, 100));
    map.register_default(&CAR).unwrap();
    map.register_default(&TREE).unwrap();

    let mut objects: Vec<_> = map.iter().map(|(_, e)| e.0).collect();
    objects.sort_unstable();
    assert_eq!(objects, vec![1, 3]);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.register_default(&CAR).unwrap().get(), 1);
}
