//! A deterministic layout engine with a fixed advance per grapheme.
//!
//! Real shaping is out of reach for a headless icon view, but wrapping,
//! line limits, ellipsization and alignment still need to behave like a
//! word-char wrapping engine. Every grapheme cluster advances
//! `font.size * advance` pixels, zero-width spaces advance nothing, and
//! every line is `font.size * line_height` pixels tall.

use std::ops::Range;

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Alignment, FontDescription, LayoutParams, LineExtents, TextLayout, TextLayoutEngine, ZERO_WIDTH_SPACE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GlyphKind {
    Visible,
    /// Whitespace; a break opportunity that does not count at line ends
    Space,
    /// Zero-width break opportunity
    Break,
    Newline,
}

#[derive(Clone, Debug)]
struct Glyph {
    chars: Range<usize>,
    advance: f32,
    kind: GlyphKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceEngine {
    /// Advance of one grapheme, as a fraction of the font size
    pub advance: f32,
    /// Line height, as a fraction of the font size
    pub line_height: f32,
}

impl Default for FixedAdvanceEngine {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.5,
        }
    }
}

impl FixedAdvanceEngine {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self { advance, line_height }
    }

    fn glyphs(&self, text: &str, font: &FontDescription) -> Vec<Glyph> {
        let advance = font.size * self.advance;
        let mut offset = 0;

        text.graphemes(true)
            .map(|grapheme| {
                let len = grapheme.chars().count();
                let chars = offset..offset + len;
                offset += len;

                let kind = if grapheme.contains('\n') {
                    GlyphKind::Newline
                } else if grapheme.starts_with(ZERO_WIDTH_SPACE) {
                    GlyphKind::Break
                } else if grapheme.chars().all(char::is_whitespace) {
                    GlyphKind::Space
                } else {
                    GlyphKind::Visible
                };

                let advance = match kind {
                    GlyphKind::Visible | GlyphKind::Space => advance,
                    GlyphKind::Break | GlyphKind::Newline => 0.0,
                };

                Glyph { chars, advance, kind }
            })
            .collect()
    }
}

/// Width of `glyphs` ignoring trailing whitespace.
fn content_width(glyphs: &[Glyph]) -> f32 {
    let end = glyphs
        .iter()
        .rposition(|glyph| !matches!(glyph.kind, GlyphKind::Space | GlyphKind::Newline))
        .map_or(0, |index| index + 1);
    glyphs[..end].iter().map(|glyph| glyph.advance).sum()
}

/// Greedy word-char wrapping. Returns glyph ranges, one per line.
fn break_lines(glyphs: &[Glyph], width: Option<f32>) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_width = 0.0;
    let mut last_break: Option<usize> = None;
    let mut index = 0;

    while index < glyphs.len() {
        let glyph = &glyphs[index];

        if glyph.kind == GlyphKind::Newline {
            lines.push(start..index + 1);
            start = index + 1;
            line_width = 0.0;
            last_break = None;
            index += 1;
            continue;
        }

        let overflows = width.is_some_and(|limit| line_width + glyph.advance > limit);
        if overflows && glyph.kind == GlyphKind::Visible && index > start {
            // Prefer the last word boundary, fall back to breaking mid-word.
            let end = last_break.filter(|&end| end > start).unwrap_or(index);
            lines.push(start..end);
            start = end;
            line_width = glyphs[start..index].iter().map(|glyph| glyph.advance).sum();
            last_break = None;
            continue;
        }

        line_width += glyph.advance;
        if matches!(glyph.kind, GlyphKind::Space | GlyphKind::Break) {
            last_break = Some(index + 1);
        }
        index += 1;
    }

    lines.push(start..glyphs.len());
    lines
}

impl TextLayoutEngine for FixedAdvanceEngine {
    fn layout(&self, text: &str, font: &FontDescription, params: &LayoutParams) -> TextLayout {
        let glyphs = self.glyphs(text, font);
        let char_count = glyphs.last().map_or(0, |glyph| glyph.chars.end);
        let line_height = font.size * self.line_height;
        let ellipsis_advance = font.size * self.advance;

        let mut ranges = break_lines(&glyphs, params.width);
        let mut ellipsized = false;

        if let Some(max_lines) = params.max_lines {
            let max_lines = max_lines.max(1);
            if ranges.len() > max_lines {
                ranges.truncate(max_lines);

                if params.ellipsize {
                    // The last line takes the rest of the text, shortened to fit.
                    if let Some(last) = ranges.last_mut() {
                        let mut end = glyphs.len();
                        if let Some(limit) = params.width {
                            while end > last.start
                                && content_width(&glyphs[last.start..end]) + ellipsis_advance > limit
                            {
                                end -= 1;
                            }
                        }
                        last.end = end;
                        ellipsized = true;
                    }
                }
            }
        }

        let widths: Vec<f32> = ranges
            .iter()
            .enumerate()
            .map(|(index, range)| {
                let width = content_width(&glyphs[range.clone()]);
                if ellipsized && index + 1 == ranges.len() {
                    width + ellipsis_advance
                } else {
                    width
                }
            })
            .collect();

        let box_width = params
            .width
            .unwrap_or_else(|| widths.iter().copied().fold(0.0, f32::max));

        let line_count = ranges.len();
        let lines = ranges.into_iter().zip(widths).enumerate().map(|(index, (range, width))| {
            let chars = match (glyphs.get(range.start), range.is_empty()) {
                (Some(first), false) => first.chars.start..glyphs[range.end - 1].chars.end,
                (Some(first), true) => first.chars.start..first.chars.start,
                (None, _) => char_count..char_count,
            };

            let mut carets: SmallVec<[f32; 32]> = SmallVec::new();
            let mut x = 0.0;
            for glyph in &glyphs[range] {
                carets.extend(std::iter::repeat(x).take(glyph.chars.len()));
                x += glyph.advance;
            }

            let offset = match params.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => (box_width - width) / 2.0,
                Alignment::Right => box_width - width,
            };

            LineExtents {
                x: offset,
                y: index as f32 * (line_height + params.spacing),
                width,
                height: line_height,
                chars,
                carets,
                ellipsized: ellipsized && index + 1 == line_count,
            }
        });

        TextLayout::new(lines, params.spacing, char_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare_label_text;

    fn font() -> FontDescription {
        FontDescription::new("Sans", 10.0)
    }

    fn params(width: Option<f32>, max_lines: Option<usize>) -> LayoutParams {
        LayoutParams {
            width,
            max_lines,
            ellipsize: true,
            ..LayoutParams::default()
        }
    }

    fn line_texts(text: &str, layout: &TextLayout) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        layout
            .lines()
            .iter()
            .map(|line| chars[line.chars.clone()].iter().collect())
            .collect()
    }

    #[test]
    fn test_single_line_is_centered() {
        let engine = FixedAdvanceEngine::default();
        let layout = engine.layout("photo.jpg", &font(), &params(Some(135.0), None));

        assert_eq!(layout.line_count(), 1);
        let line = &layout.lines()[0];
        assert_eq!(line.width, 45.0);
        assert_eq!(line.x, 45.0);
        assert_eq!(line.height, 15.0);
        assert_eq!(layout.full_size().width, 45);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        let engine = FixedAdvanceEngine::default();
        let text = "aaaa bbbb cccc";
        let layout = engine.layout(text, &font(), &params(Some(40.0), None));
        assert_eq!(line_texts(text, &layout), vec!["aaaa ", "bbbb ", "cccc"]);
        assert_eq!(layout.lines()[1].width, 20.0);
        assert_eq!(layout.lines()[2].y, 30.0);
    }

    #[test]
    fn test_wraps_at_inserted_breaks() {
        let engine = FixedAdvanceEngine::default();
        let prepared = prepare_label_text("long_file_name.tar.gz");
        let layout = engine.layout(prepared.as_str(), &font(), &params(Some(50.0), None));
        let lines: Vec<String> = line_texts(prepared.as_str(), &layout)
            .into_iter()
            .map(|line| line.replace(ZERO_WIDTH_SPACE, ""))
            .collect();
        assert_eq!(lines, vec!["long_file_", "name.tar.", "gz"]);
    }

    #[test]
    fn test_long_words_break_anywhere() {
        let engine = FixedAdvanceEngine::default();
        let text = "abcdefghijklmnop";
        let layout = engine.layout(text, &font(), &params(Some(50.0), None));
        assert_eq!(line_texts(text, &layout), vec!["abcdefghij", "klmnop"]);
    }

    #[test]
    fn test_line_limit_ellipsizes_last_line() {
        let engine = FixedAdvanceEngine::default();
        let text = "aaaa bbbb cccc dddd eeee ffff";
        let layout = engine.layout(text, &font(), &params(Some(50.0), Some(2)));

        assert_eq!(layout.line_count(), 2);
        assert!(layout.is_truncated());
        let last = &layout.lines()[1];
        assert!(last.ellipsized);
        assert_eq!(line_texts(text, &layout)[1], "cccc dddd ");
        // 45px of text plus the ellipsis
        assert_eq!(last.width, 50.0);

        let unlimited = engine.layout(text, &font(), &params(Some(50.0), None));
        assert_eq!(unlimited.line_count(), 3);
        assert!(!unlimited.is_truncated());
    }

    #[test]
    fn test_hard_newlines() {
        let engine = FixedAdvanceEngine::default();
        let layout = engine.layout("ab\ncd", &font(), &LayoutParams::default());
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.lines()[0].width, 10.0);
        assert_eq!(layout.full_size().height, 30);
    }

    #[test]
    fn test_unbounded_layout_uses_widest_line() {
        let engine = FixedAdvanceEngine::default();
        let params = LayoutParams {
            alignment: Alignment::Center,
            ..LayoutParams::default()
        };
        let layout = engine.layout("abcd\nab", &font(), &params);
        assert_eq!(layout.lines()[0].x, 0.0);
        assert_eq!(layout.lines()[1].x, 5.0);
        assert_eq!(layout.char_count(), 7);
    }
}
