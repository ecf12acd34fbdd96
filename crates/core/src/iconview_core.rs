//! # Geometry and color primitives for the icon view
//!
//! This crate provides the small value types shared by every other crate in
//! the workspace: world-space bounds, integer pixel rectangles, the
//! world-to-canvas transform owned by the hosting canvas, and color parsing.

pub mod bounds;
pub mod color;
pub mod rect;
pub mod transform;

pub use bounds::Bounds;
pub use color::Color;
pub use rect::IRect;
pub use transform::CanvasTransform;
