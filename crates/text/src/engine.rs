use crate::{FontDescription, LayoutParams, TextLayout};

/// A text shaping and line-breaking service.
///
/// Offsets in the returned layout are char offsets into `text`.
pub trait TextLayoutEngine {
    fn layout(&self, text: &str, font: &FontDescription, params: &LayoutParams) -> TextLayout;
}

impl<T: TextLayoutEngine + ?Sized> TextLayoutEngine for &T {
    fn layout(&self, text: &str, font: &FontDescription, params: &LayoutParams) -> TextLayout {
        (**self).layout(text, font, params)
    }
}

impl<T: TextLayoutEngine + ?Sized> TextLayoutEngine for std::rc::Rc<T> {
    fn layout(&self, text: &str, font: &FontDescription, params: &LayoutParams) -> TextLayout {
        (**self).layout(text, font, params)
    }
}
