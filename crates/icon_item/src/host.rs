use std::rc::Rc;

use glam::IVec2;
use iconview_core::CanvasTransform;
use image::{DynamicImage, GenericImageView};
use text_layout::{FontDescription, TextLayoutEngine};
use theme::StyleProvider;

/// The canvas an item lives on, as seen by the item.
///
/// Everything here is owned by the canvas and read-only to the item.
pub trait ItemHost {
    /// Current zoom: canvas pixels per world unit.
    fn pixels_per_unit(&self) -> f64;

    /// World to canvas-pixel mapping, including the scroll offset.
    fn transform(&self) -> CanvasTransform;

    /// Whether the canvas widget has input focus. Picks the selection tint.
    fn has_focus(&self) -> bool;

    /// Lines a label may take when it is not shown in full.
    fn max_layout_lines(&self) -> usize;

    /// Font for labels at the current zoom level.
    fn label_font(&self) -> &FontDescription;

    /// Font for text drawn inside icon images.
    fn embedded_text_font(&self) -> &FontDescription;

    fn text_engine(&self) -> &dyn TextLayoutEngine;

    fn style(&self) -> &dyn StyleProvider;

    /// Draw a hover frame behind the label of the item under the pointer.
    fn prelight_label(&self) -> bool;

    /// Items activate on a single click, so hovering shows a hand cursor.
    fn single_click_mode(&self) -> bool;

    /// Image drawn at each corner of an icon showing stretch handles.
    fn knob_image(&self) -> &Rc<DynamicImage>;

    fn knob_size(&self) -> IVec2 {
        let (width, height) = self.knob_image().dimensions();
        IVec2::new(width as i32, height as i32)
    }
}
