use std::rc::Rc;

use glam::DVec2;
use icon_item::ItemHost;
use iconview_core::{color, CanvasTransform};
use image::{DynamicImage, Rgba, RgbaImage};
use text_layout::{FixedAdvanceEngine, FontDescription, TextLayoutEngine};
use theme::{StyleProvider, Theme};

use crate::{ClickPolicy, ContainerConfig, ZoomLevel};

/// Canvas state shared by every item of a container.
pub struct CanvasEnv {
    config: ContainerConfig,

    zoom: ZoomLevel,

    /// World point shown at the top-left corner of the canvas
    scroll_origin: DVec2,

    /// Whether the canvas widget has input focus
    has_focus: bool,

    /// Label font for the current zoom level
    label_font: FontDescription,

    embedded_text_font: FontDescription,

    engine: Box<dyn TextLayoutEngine>,

    theme: Theme,

    knob: Rc<DynamicImage>,
}

impl CanvasEnv {
    pub fn new(config: ContainerConfig, theme: Theme) -> Self {
        let zoom = ZoomLevel::default();
        Self {
            label_font: config.label_font(zoom),
            embedded_text_font: config.embedded_text_font(),
            knob: knob_image(config.knob_size, &theme),
            engine: Box::new(FixedAdvanceEngine::default()),
            config,
            zoom,
            scroll_origin: DVec2::ZERO,
            has_focus: false,
            theme,
        }
    }

    /// Lay text out with `engine` instead of the fixed-advance engine.
    pub fn with_text_engine(mut self, engine: Box<dyn TextLayoutEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom
    }

    pub(crate) fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
        self.label_font = self.config.label_font(zoom);
    }

    pub fn scroll_origin(&self) -> DVec2 {
        self.scroll_origin
    }

    pub(crate) fn set_scroll_origin(&mut self, origin: DVec2) {
        self.scroll_origin = origin;
    }

    pub(crate) fn set_has_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }
}

/// A square knob: the selection color with a lighter center.
fn knob_image(size: u32, theme: &Theme) -> Rc<DynamicImage> {
    let border = color::to_rgba8(theme.selected_background);
    let center = color::to_rgba8(theme.selected_text);
    let last = size.saturating_sub(1);

    let knob = RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 || y == 0 || x == last || y == last {
            Rgba(border)
        } else {
            Rgba(center)
        }
    });
    Rc::new(DynamicImage::ImageRgba8(knob))
}

impl ItemHost for CanvasEnv {
    fn pixels_per_unit(&self) -> f64 {
        self.zoom.pixels_per_unit()
    }

    fn transform(&self) -> CanvasTransform {
        CanvasTransform::for_scroll_origin(self.scroll_origin, self.pixels_per_unit())
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn max_layout_lines(&self) -> usize {
        self.config.max_layout_lines
    }

    fn label_font(&self) -> &FontDescription {
        &self.label_font
    }

    fn embedded_text_font(&self) -> &FontDescription {
        &self.embedded_text_font
    }

    fn text_engine(&self) -> &dyn TextLayoutEngine {
        self.engine.as_ref()
    }

    fn style(&self) -> &dyn StyleProvider {
        &self.theme
    }

    fn prelight_label(&self) -> bool {
        self.config.prelight_label
    }

    fn single_click_mode(&self) -> bool {
        self.config.click_policy == ClickPolicy::Single
    }

    fn knob_image(&self) -> &Rc<DynamicImage> {
        &self.knob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_knob_follows_config() {
        let config = ContainerConfig {
            knob_size: 6,
            ..ContainerConfig::default()
        };
        let env = CanvasEnv::new(config, Theme::light());
        assert_eq!(env.knob_size(), IVec2::new(6, 6));

        let knob = env.knob_image().to_rgba8();
        assert_eq!(knob.get_pixel(0, 0).0, color::to_rgba8(Theme::light().selected_background));
        assert_eq!(knob.get_pixel(3, 3).0, color::to_rgba8(Theme::light().selected_text));
    }

    #[test]
    fn test_zoom_changes_scale_and_font() {
        let mut env = CanvasEnv::new(ContainerConfig::default(), Theme::light());
        assert_eq!(env.pixels_per_unit(), 1.0);
        assert_eq!(env.label_font().size, 10.0);

        env.set_zoom_level(ZoomLevel::Larger);
        env.set_scroll_origin(DVec2::new(10.0, 0.0));
        assert_eq!(env.pixels_per_unit(), 2.0);
        assert_eq!(env.label_font().size, 11.0);
        assert_eq!(env.transform().world_to_canvas(DVec2::new(20.0, 5.0)), IVec2::new(20, 10));
    }

    #[test]
    fn test_click_policy() {
        let config = ContainerConfig {
            click_policy: ClickPolicy::Single,
            ..ContainerConfig::default()
        };
        assert!(CanvasEnv::new(config, Theme::dark()).single_click_mode());
        assert!(!CanvasEnv::new(ContainerConfig::default(), Theme::dark()).single_click_mode());
    }
}
