//! # Text layout
//!
//! The icon view never shapes text itself. Labels are handed to a
//! [`TextLayoutEngine`] together with a [`FontDescription`] and
//! [`LayoutParams`], and the engine returns line-broken metrics in a
//! [`TextLayout`]. Everything the icon item needs to know about text
//! (sizes, per-line extents, character positions) is read from that value.
//!
//! [`FixedAdvanceEngine`] is a deterministic engine where every grapheme has
//! the same advance. It backs the command-line tool and the tests.

pub mod engine;
pub mod fixed;
pub mod font;
pub mod layout;
pub mod wrap;

pub use engine::TextLayoutEngine;
pub use fixed::FixedAdvanceEngine;
pub use font::FontDescription;
pub use layout::{Alignment, CharRect, LayoutParams, LineExtents, PixelSize, TextLayout};
pub use wrap::{prepare_label_text, PreparedText, ZERO_WIDTH_SPACE};
