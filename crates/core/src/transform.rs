//! World to canvas-pixel mapping.
//!
//! The container only scrolls and zooms, so the mapping is a uniform scale
//! (the pixels-per-unit) followed by a translation.

use glam::{DVec2, IVec2};

/// `canvas = world * scale + offset`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasTransform {
    /// Canvas pixels
    pub offset: DVec2,
    /// Pixels per world unit
    pub scale: f64,
}

impl CanvasTransform {
    pub fn new(offset: DVec2, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// Transform for a canvas whose scroll region starts at `scroll_origin`
    /// (world units) and is zoomed to `pixels_per_unit`.
    pub fn for_scroll_origin(scroll_origin: DVec2, pixels_per_unit: f64) -> Self {
        Self {
            offset: -scroll_origin * pixels_per_unit,
            scale: pixels_per_unit,
        }
    }

    pub fn apply(&self, point: DVec2) -> DVec2 {
        point * self.scale + self.offset
    }

    /// World point to unrounded canvas coordinates.
    pub fn world_to_canvas_f64(&self, world: DVec2) -> DVec2 {
        self.apply(world)
    }

    /// World point to the canvas pixel containing it (rounds half up).
    pub fn world_to_canvas(&self, world: DVec2) -> IVec2 {
        let canvas = self.apply(world);
        IVec2::new(
            (canvas.x + 0.5).floor() as i32,
            (canvas.y + 0.5).floor() as i32,
        )
    }
}
