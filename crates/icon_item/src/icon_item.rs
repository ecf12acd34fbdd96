//! # Icon item
//!
//! A canvas item that shows one file: its icon image, a label made of the
//! editable file name and read-only additional text, highlight states and
//! stretch handles.
//!
//! The item keeps three caches, each invalidated independently:
//!
//! - label metrics: widths and the display, layout and entire-text heights
//!   of the label ([`label`])
//! - bounds: icon, text and total rectangles for each [`BoundsUsage`]
//!   ([`bounds`])
//! - the rendered image: the icon with hover and selection effects applied
//!   ([`render`])
//!
//! Everything the item needs from its canvas (zoom, fonts, colors, the text
//! engine) is read through [`ItemHost`]. The item never calls back into the
//! canvas; it queues [`ItemRequest`]s that the canvas drains.

pub mod bounds;
pub mod effects;
pub mod error;
pub mod host;
pub mod item;
pub mod label;
pub mod paint;
pub mod render;
pub mod request;
pub mod stretch;

#[cfg(test)]
pub(crate) mod test_support;

pub use bounds::{BoundsUsage, ItemBounds};
pub use error::IconItemError;
pub use host::ItemHost;
pub use item::{redraw_region, IconItem};
pub use label::LabelMetrics;
pub use paint::{DisplayList, DrawOp, Painter};
pub use render::RenderKey;
pub use request::{CursorKind, ItemEvent, ItemRequest, SurfaceId};
pub use stretch::Corner;

/// Gap between the icon and its label, in pixels.
pub const LABEL_OFFSET: i32 = 1;

/// Space between the editable and the additional text, in pixels.
pub const LABEL_LINE_SPACING: i32 = 0;

/// Widest a label may be at the standard zoom level, in pixels.
pub const MAX_TEXT_WIDTH_STANDARD: f64 = 135.0;

/// Horizontal padding on each side of the label.
pub const TEXT_BACK_PADDING_X: i32 = 4;

/// Vertical padding above and below the label.
pub const TEXT_BACK_PADDING_Y: i32 = 1;

/// Distance [`IconItem::point`] reports for a miss at the given zoom.
pub fn point_miss_distance(pixels_per_unit: f64) -> f64 {
    pixels_per_unit * 2.0 + 10.0
}
