//! Layout parameters and the metrics a layout engine produces.

use std::ops::Range;

use smallvec::SmallVec;
use strum_macros::Display;

/// Horizontal alignment of lines within the layout width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// How a text should be broken into lines.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Wrap width in pixels; `None` lays the text out on unbounded lines.
    pub width: Option<f32>,
    /// Keep at most this many lines; `None` keeps all of them.
    pub max_lines: Option<usize>,
    /// Shorten the last kept line with an ellipsis when lines were dropped.
    pub ellipsize: bool,
    /// Extra space between lines, in pixels.
    pub spacing: f32,
    pub alignment: Alignment,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: None,
            max_lines: None,
            ellipsize: false,
            spacing: 0.0,
            alignment: Alignment::Center,
        }
    }
}

/// One laid out line. Positions are relative to the layout origin.
#[derive(Clone, Debug, PartialEq)]
pub struct LineExtents {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Char offsets of the laid out text shown on this line.
    pub chars: Range<usize>,
    /// Left edge of each char in `chars`, relative to `x`.
    pub carets: SmallVec<[f32; 32]>,
    /// The line ends in an ellipsis replacing dropped text.
    pub ellipsized: bool,
}

impl LineExtents {
    fn caret(&self, index: usize) -> f32 {
        if index < self.chars.end {
            self.carets[index - self.chars.start]
        } else {
            self.width
        }
    }
}

/// Pixel size of a layout's logical rectangle, each value rounded half up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelSize {
    pub width: i32,
    pub height: i32,
    /// Offset between the rounded right edge and the rounded width, for
    /// layouts whose lines do not start at x = 0.
    pub dx: i32,
}

/// Position and size of one character, relative to the layout origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The result of laying out a text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    lines: SmallVec<[LineExtents; 4]>,
    spacing: f32,
    char_count: usize,
}

fn round_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl TextLayout {
    pub fn new(lines: impl IntoIterator<Item = LineExtents>, spacing: f32, char_count: usize) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            spacing,
            char_count,
        }
    }

    pub fn lines(&self) -> &[LineExtents] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Number of chars in the text that was laid out, including any that
    /// were dropped by line limits.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// True when line limits dropped part of the text.
    pub fn is_truncated(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| line.ellipsized || line.chars.end < self.char_count)
    }

    /// `(x, y, width, height)` of the box enclosing every line.
    pub fn logical_rect(&self) -> (f32, f32, f32, f32) {
        let Some(last) = self.lines.last() else {
            return (0.0, 0.0, 0.0, 0.0);
        };

        let left = self.lines.iter().map(|line| line.x).fold(f32::INFINITY, f32::min);
        let right = self
            .lines
            .iter()
            .map(|line| line.x + line.width)
            .fold(f32::NEG_INFINITY, f32::max);

        (left, 0.0, right - left, last.y + last.height)
    }

    pub fn full_size(&self) -> PixelSize {
        let (x, _, width, height) = self.logical_rect();
        let rounded_width = round_px(width);
        PixelSize {
            width: rounded_width,
            height: round_px(height),
            dx: round_px(x + width) - rounded_width,
        }
    }

    /// Height of the first `max_lines` lines. When the layout has no more
    /// lines than that, `entire_height` is returned unchanged.
    pub fn height_for_lines(&self, max_lines: usize, entire_height: i32) -> i32 {
        if self.lines.len() <= max_lines {
            return entire_height;
        }

        let kept = &self.lines[..max_lines];
        let heights: i32 = kept.iter().map(|line| round_px(line.height)).sum();
        let gaps = kept.len().saturating_sub(1) as i32;
        heights + gaps * round_px(self.spacing)
    }

    /// Extents of the char at `index`. Chars hidden by truncation report
    /// the end of the last line.
    pub fn char_extents(&self, index: usize) -> Option<CharRect> {
        let last = self.lines.last()?;
        let line = self
            .lines
            .iter()
            .find(|line| line.chars.contains(&index))
            .unwrap_or(last);

        let start = line.caret(index.clamp(line.chars.start, line.chars.end));
        let end = if line.chars.contains(&index) {
            line.caret(index + 1)
        } else {
            start
        };

        Some(CharRect {
            x: line.x + start,
            y: line.y,
            width: end - start,
            height: line.height,
        })
    }

    /// Char offset under `(x, y)`, or `None` when the point is outside
    /// every line.
    pub fn index_at_point(&self, x: f32, y: f32) -> Option<usize> {
        let line = self
            .lines
            .iter()
            .find(|line| y >= line.y && y < line.y + line.height)?;

        let local = x - line.x;
        if local < 0.0 || local >= line.width {
            return None;
        }

        let index = (line.chars.start..line.chars.end)
            .rev()
            .find(|&index| line.caret(index) <= local)
            .unwrap_or(line.chars.start);
        Some(index)
    }
}
