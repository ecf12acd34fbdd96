use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;
use iconview_core::CanvasTransform;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use text_layout::{FixedAdvanceEngine, FontDescription, LayoutParams, TextLayout, TextLayoutEngine};
use theme::{StyleProvider, Theme};

use crate::ItemHost;

/// Fixed-advance engine that counts how often it lays text out.
#[derive(Default)]
pub(crate) struct CountingEngine {
    inner: FixedAdvanceEngine,
    calls: Cell<usize>,
}

impl CountingEngine {
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TextLayoutEngine for CountingEngine {
    fn layout(&self, text: &str, font: &FontDescription, params: &LayoutParams) -> TextLayout {
        self.calls.set(self.calls.get() + 1);
        self.inner.layout(text, font, params)
    }
}

/// Host with a 10pt label font on the fixed-advance engine: 5px per
/// grapheme, 15px per line.
pub(crate) struct TestHost {
    pub ppu: f64,
    pub scroll_origin: DVec2,
    pub has_focus: bool,
    pub max_lines: usize,
    pub font: FontDescription,
    pub embedded_font: FontDescription,
    pub engine: CountingEngine,
    pub theme: Theme,
    pub prelight_label: bool,
    pub single_click: bool,
    pub knob: Rc<DynamicImage>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self {
            ppu: 1.0,
            scroll_origin: DVec2::ZERO,
            has_focus: true,
            max_lines: 3,
            font: FontDescription::new("Sans", 10.0),
            embedded_font: FontDescription::new("monospace", 6.0),
            engine: CountingEngine::default(),
            theme: Theme::light(),
            prelight_label: true,
            single_click: false,
            knob: rgba_image(8, 8, [255, 255, 255, 255]),
        }
    }
}

impl ItemHost for TestHost {
    fn pixels_per_unit(&self) -> f64 {
        self.ppu
    }

    fn transform(&self) -> CanvasTransform {
        CanvasTransform::for_scroll_origin(self.scroll_origin, self.ppu)
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn max_layout_lines(&self) -> usize {
        self.max_lines
    }

    fn label_font(&self) -> &FontDescription {
        &self.font
    }

    fn embedded_text_font(&self) -> &FontDescription {
        &self.embedded_font
    }

    fn text_engine(&self) -> &dyn TextLayoutEngine {
        &self.engine
    }

    fn style(&self) -> &dyn StyleProvider {
        &self.theme
    }

    fn prelight_label(&self) -> bool {
        self.prelight_label
    }

    fn single_click_mode(&self) -> bool {
        self.single_click
    }

    fn knob_image(&self) -> &Rc<DynamicImage> {
        &self.knob
    }
}

pub(crate) fn rgba_image(width: u32, height: u32, pixel: [u8; 4]) -> Rc<DynamicImage> {
    Rc::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel))))
}

pub(crate) fn rgb_image(width: u32, height: u32, pixel: [u8; 3]) -> Rc<DynamicImage> {
    Rc::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(pixel))))
}
