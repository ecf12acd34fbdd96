//! Drawing surface abstraction.
//!
//! Items paint through [`Painter`] with colors already resolved from the
//! style provider. [`DisplayList`] records what was painted; it backs drag
//! previews, the command-line renderer and the tests.

use std::fmt;
use std::rc::Rc;

use glam::IVec2;
use iconview_core::{Color, IRect};
use image::{DynamicImage, GenericImageView};
use text_layout::{TextLayout, ZERO_WIDTH_SPACE};
use theme::StyleClass;

pub trait Painter {
    fn draw_image(&mut self, image: &Rc<DynamicImage>, origin: IVec2);

    /// Outline of a highlighted label frame.
    fn render_frame(&mut self, rect: IRect, color: Color);

    /// Fill of a highlighted label frame.
    fn render_background(&mut self, rect: IRect, color: Color);

    /// Draw `layout`, the layout of `text`, with its origin at `origin`.
    fn render_layout(&mut self, text: &str, layout: &TextLayout, origin: IVec2, color: Color, class: StyleClass);

    /// Keyboard focus indicator around `rect`.
    fn render_focus(&mut self, rect: IRect, color: Color);

    /// One pixel wide dashed outline, inset half a pixel into `rect`.
    fn stroke_dashed_rect(&mut self, rect: IRect, dash: f64, color: Color);

    fn push_clip(&mut self, rect: IRect);

    fn pop_clip(&mut self);
}

/// One recorded painting operation.
#[derive(Clone, Debug)]
pub enum DrawOp {
    Image {
        image: Rc<DynamicImage>,
        origin: IVec2,
    },
    Frame {
        rect: IRect,
        color: Color,
    },
    Background {
        rect: IRect,
        color: Color,
    },
    Text {
        /// Visible text of each line, an ellipsis marking dropped text
        lines: Vec<String>,
        origin: IVec2,
        color: Color,
        class: StyleClass,
    },
    Focus {
        rect: IRect,
        color: Color,
    },
    DashedRect {
        rect: IRect,
        dash: f64,
        color: Color,
    },
    PushClip(IRect),
    PopClip,
}

/// Paint operations recorded in order, optionally for a surface of a fixed
/// size.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub size: Option<IVec2>,
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(size: IVec2) -> Self {
        Self {
            size: Some(size),
            ops: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Recorded text lines, in paint order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.ops
            .iter()
            .flat_map(|op| match op {
                DrawOp::Text { lines, .. } => lines.as_slice(),
                _ => &[][..],
            })
            .map(String::as_str)
    }
}

/// Visible text of each line of `layout`.
fn visible_lines(text: &str, layout: &TextLayout) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    layout
        .lines()
        .iter()
        .map(|line| {
            let end = line.chars.end.min(chars.len());
            let start = line.chars.start.min(end);
            let mut visible: String = chars[start..end]
                .iter()
                .filter(|&&c| c != ZERO_WIDTH_SPACE && c != '\n')
                .collect();
            if line.ellipsized {
                visible.push('…');
            }
            visible
        })
        .collect()
}

impl Painter for DisplayList {
    fn draw_image(&mut self, image: &Rc<DynamicImage>, origin: IVec2) {
        self.ops.push(DrawOp::Image {
            image: Rc::clone(image),
            origin,
        });
    }

    fn render_frame(&mut self, rect: IRect, color: Color) {
        self.ops.push(DrawOp::Frame { rect, color });
    }

    fn render_background(&mut self, rect: IRect, color: Color) {
        self.ops.push(DrawOp::Background { rect, color });
    }

    fn render_layout(&mut self, text: &str, layout: &TextLayout, origin: IVec2, color: Color, class: StyleClass) {
        self.ops.push(DrawOp::Text {
            lines: visible_lines(text, layout),
            origin,
            color,
            class,
        });
    }

    fn render_focus(&mut self, rect: IRect, color: Color) {
        self.ops.push(DrawOp::Focus { rect, color });
    }

    fn stroke_dashed_rect(&mut self, rect: IRect, dash: f64, color: Color) {
        self.ops.push(DrawOp::DashedRect { rect, dash, color });
    }

    fn push_clip(&mut self, rect: IRect) {
        self.ops.push(DrawOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }
}

struct Hex(Color);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = iconview_core::color::to_rgba8(self.0);
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

struct Rect(IRect);

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let IRect { min, max } = self.0;
        write!(f, "({}, {})-({}, {})", min.x, min.y, max.x, max.y)
    }
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::Image { image, origin } => {
                let (width, height) = image.dimensions();
                write!(f, "image {width}x{height} at ({}, {})", origin.x, origin.y)
            }
            DrawOp::Frame { rect, color } => write!(f, "frame {} {}", Rect(*rect), Hex(*color)),
            DrawOp::Background { rect, color } => {
                write!(f, "background {} {}", Rect(*rect), Hex(*color))
            }
            DrawOp::Text {
                lines,
                origin,
                color,
                class,
            } => write!(
                f,
                "text {class} at ({}, {}) {} {:?}",
                origin.x,
                origin.y,
                Hex(*color),
                lines
            ),
            DrawOp::Focus { rect, color } => write!(f, "focus {} {}", Rect(*rect), Hex(*color)),
            DrawOp::DashedRect { rect, dash, color } => {
                write!(f, "dashed {} dash={dash} {}", Rect(*rect), Hex(*color))
            }
            DrawOp::PushClip(rect) => write!(f, "push-clip {}", Rect(*rect)),
            DrawOp::PopClip => write!(f, "pop-clip"),
        }
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(size) = self.size {
            writeln!(f, "surface {}x{}", size.x, size.y)?;
        }
        for op in &self.ops {
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rgb_image;
    use text_layout::{prepare_label_text, FixedAdvanceEngine, FontDescription, LayoutParams, TextLayoutEngine};

    #[test]
    fn test_text_ops_hide_breaks_and_show_ellipsis() {
        let prepared = prepare_label_text("archive_2024_final_version.tar.gz");
        let params = LayoutParams {
            width: Some(60.0),
            max_lines: Some(2),
            ellipsize: true,
            ..LayoutParams::default()
        };
        let layout = FixedAdvanceEngine::default().layout(prepared.as_str(), &FontDescription::new("Sans", 10.0), &params);

        let mut list = DisplayList::new();
        list.render_layout(prepared.as_str(), &layout, IVec2::ZERO, Color::new(0.0, 0.0, 0.0, 1.0), StyleClass::Label);

        let lines: Vec<&str> = list.text_lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "archive_");
        assert!(lines[1].ends_with('…'));
        assert!(!lines.iter().any(|line| line.contains(ZERO_WIDTH_SPACE)));
    }

    #[test]
    fn test_display_format() {
        let mut list = DisplayList::with_size(IVec2::new(40, 60));
        list.draw_image(&rgb_image(32, 32, [0, 0, 0]), IVec2::new(4, 0));
        list.push_clip(IRect::from_coords(0, 0, 10, 10));
        list.pop_clip();
        list.render_focus(IRect::from_coords(0, 32, 40, 60), Color::new(1.0, 0.0, 0.0, 1.0));

        let printed = list.to_string();
        assert_eq!(
            printed,
            "surface 40x60\n\
             image 32x32 at (4, 0)\n\
             push-clip (0, 0)-(10, 10)\n\
             pop-clip\n\
             focus (0, 32)-(40, 60) #ff0000ff\n"
        );
        assert_eq!(list.len(), 4);
    }
}
