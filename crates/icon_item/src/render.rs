//! The icon image as drawn, with hover and selection effects applied.

use std::rc::Rc;

use image::DynamicImage;
use theme::{StyleProvider, StyleState};

use crate::effects;

/// The highlight state a rendered image was produced for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub prelit: bool,
    pub highlighted_for_selection: bool,
    pub highlighted_for_drop: bool,
    pub highlighted_for_clipboard: bool,
    /// Canvas focus; only recorded while a tint applies, since it only
    /// picks the tint color.
    pub focused: bool,
}

impl RenderKey {
    pub fn new(
        prelit: bool,
        highlighted_for_selection: bool,
        highlighted_for_drop: bool,
        highlighted_for_clipboard: bool,
        canvas_has_focus: bool,
    ) -> Self {
        let tinted = highlighted_for_selection || highlighted_for_drop;
        Self {
            prelit,
            highlighted_for_selection,
            highlighted_for_drop,
            highlighted_for_clipboard,
            focused: tinted && canvas_has_focus,
        }
    }

    pub fn needs_spotlight(&self) -> bool {
        self.prelit || self.highlighted_for_clipboard
    }

    pub fn needs_tint(&self) -> bool {
        self.highlighted_for_selection || self.highlighted_for_drop
    }

    /// Style state whose background color tints the image.
    pub fn tint_state(&self) -> StyleState {
        if self.focused {
            StyleState::Selected
        } else {
            StyleState::Active
        }
    }
}

/// Memoized rendered image.
#[derive(Default)]
pub struct RenderCache {
    rendered: Option<(RenderKey, Rc<DynamicImage>)>,
}

impl RenderCache {
    /// The image for `key`, rebuilt from `source` only when the key changed
    /// since the last call.
    pub fn get(&mut self, source: &Rc<DynamicImage>, key: RenderKey, style: &dyn StyleProvider) -> Rc<DynamicImage> {
        if let Some((cached_key, image)) = &self.rendered {
            if *cached_key == key {
                return Rc::clone(image);
            }
        }

        let image = render(source, key, style);
        log::trace!("rendered icon image for {:?}", key);
        self.rendered = Some((key, Rc::clone(&image)));
        image
    }

    pub fn clear(&mut self) {
        self.rendered = None;
    }

    pub fn is_cached(&self) -> bool {
        self.rendered.is_some()
    }
}

fn render(source: &Rc<DynamicImage>, key: RenderKey, style: &dyn StyleProvider) -> Rc<DynamicImage> {
    let mut image = Rc::clone(source);

    if key.needs_spotlight() {
        image = Rc::new(effects::spotlight(&image));
    }

    if key.needs_tint() {
        let [r, g, b, _] = iconview_core::color::to_rgba8(style.background_color(key.tint_state()));
        image = Rc::new(effects::colorize(&image, [r, g, b]));
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rgba_image;
    use theme::Theme;

    #[test]
    fn test_plain_key_returns_source() {
        let theme = Theme::light();
        let source = rgba_image(4, 4, [10, 20, 30, 255]);
        let mut cache = RenderCache::default();

        let image = cache.get(&source, RenderKey::default(), &theme);
        assert!(Rc::ptr_eq(&image, &source));
    }

    #[test]
    fn test_unchanged_key_reuses_image() {
        let theme = Theme::light();
        let source = rgba_image(4, 4, [10, 20, 30, 255]);
        let mut cache = RenderCache::default();
        let key = RenderKey::new(true, true, false, false, true);

        let first = cache.get(&source, key, &theme);
        let second = cache.get(&source, key, &theme);
        assert!(Rc::ptr_eq(&first, &second));
        assert!(!Rc::ptr_eq(&first, &source));
        assert_eq!(source.to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_spotlight_comes_before_tint() {
        let theme = Theme::light();
        let source = rgba_image(1, 1, [80, 80, 80, 255]);
        let mut cache = RenderCache::default();
        let [r, g, b, _] = iconview_core::color::to_rgba8(theme.background_color(StyleState::Selected));

        let rendered = cache.get(&source, RenderKey::new(true, true, false, false, true), &theme);
        let pixel = rendered.to_rgba8().get_pixel(0, 0).0;

        let expected = effects::colorize(&effects::spotlight(&source), [r, g, b]);
        let reversed = effects::spotlight(&effects::colorize(&source, [r, g, b]));
        assert_eq!(pixel, expected.to_rgba8().get_pixel(0, 0).0);
        assert_ne!(pixel, reversed.to_rgba8().get_pixel(0, 0).0);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_focus_change_rebuilds_only_when_tinted() {
        let theme = Theme::light();
        let source = rgba_image(2, 2, [200, 200, 200, 255]);
        let mut cache = RenderCache::default();

        let lit_focused = cache.get(&source, RenderKey::new(true, false, false, false, true), &theme);
        let lit_unfocused = cache.get(&source, RenderKey::new(true, false, false, false, false), &theme);
        assert!(Rc::ptr_eq(&lit_focused, &lit_unfocused));

        let drop_focused = cache.get(&source, RenderKey::new(false, false, true, false, true), &theme);
        let drop_unfocused = cache.get(&source, RenderKey::new(false, false, true, false, false), &theme);
        assert!(!Rc::ptr_eq(&drop_focused, &drop_unfocused));
        assert_ne!(
            drop_focused.to_rgba8().get_pixel(0, 0),
            drop_unfocused.to_rgba8().get_pixel(0, 0)
        );
    }
}
