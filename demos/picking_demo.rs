//! Picking demo: registers a few objects, rasterizes them into a CPU id buffer
//! and picks along a horizontal scanline.
//!
//! Run with `RUST_LOG=debug` to see registry and pick traces.

use std::collections::HashMap;

use idmap::*;

/// A flat scene of named rectangles.
struct Canvas {
    rects: HashMap<&'static str, (UVec2, UVec2, Option<IdColor>)>,
    buffers: HashMap<String, CpuIdBuffer>,
}

impl Canvas {
    fn render(&mut self, size: UVec2) {
        let mut buffer = CpuIdBuffer::new(size.x, size.y);
        for (min, max, color) in self.rects.values() {
            if let Some(color) = color {
                buffer.fill_rect(*min, *max, *color);
            }
        }
        self.buffers.insert(DEFAULT_BUFFER_NAME.to_string(), buffer);
    }
}

impl SurfacePainter for Canvas {
    type Object = &'static str;
    type Surface = &'static str;

    fn drawable_surfaces(
        &self,
        object: &&'static str,
        _include_children: bool,
    ) -> Vec<&'static str> {
        self.rects
            .get_key_value(object)
            .map(|(name, _)| *name)
            .into_iter()
            .collect()
    }

    fn set_surface_color(&mut self, surfaces: &[&'static str], color: IdColor) {
        for name in surfaces {
            if let Some(rect) = self.rects.get_mut(name) {
                rect.2 = Some(color);
            }
        }
    }
}

impl IdBufferSource for Canvas {
    type Buffer = CpuIdBuffer;

    fn id_buffer(&self, name: &str) -> Option<&CpuIdBuffer> {
        self.buffers.get(name)
    }
}

fn main() -> Result<()> {
    init_logging();

    let canvas = Canvas {
        rects: HashMap::from([
            ("red box", (UVec2::new(0, 0), UVec2::new(20, 20), None)),
            ("green box", (UVec2::new(30, 0), UVec2::new(50, 20), None)),
            ("blue box", (UVec2::new(60, 0), UVec2::new(80, 20), None)),
        ]),
        buffers: HashMap::new(),
    };

    // Half-resolution id buffer behind a 160x40 window
    let mut map = IdMap::new(canvas, UVec2::new(160, 40));
    for name in ["red box", "green box", "blue box"] {
        let id = map.register_default(&name)?;
        println!("{name:>10} -> id {id} color {:?}", encode(id).to_rgba());
    }
    map.renderer_mut().render(UVec2::new(80, 20));

    for x in (0..160).step_by(20) {
        #[allow(clippy::cast_precision_loss)]
        let point = Vec2::new(x as f32 + 5.0, 10.0);
        match map.get_selected(point)? {
            Some(name) => println!("({:>5.1}, {:>4.1}) -> {name}", point.x, point.y),
            None => println!("({:>5.1}, {:>4.1}) -> nothing", point.x, point.y),
        }
    }

    map.unregister(&"green box")?;
    let after = map.get_selected(Vec2::new(85.0, 10.0))?;
    println!("after unregistering green box: {after:?}");

    Ok(())
}
