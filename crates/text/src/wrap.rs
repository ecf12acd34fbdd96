//! Break opportunities for file names.
//!
//! File names rarely contain spaces, so a word-wrapping engine would only
//! break them at arbitrary characters. Zero-width spaces are inserted after
//! separators so lines break at `_`, `-` and most `.` characters instead.
//! A dot followed by a short number (`1.2`, `foo-1.2.3`) is kept together;
//! a dot followed by three or more digits (`192.168...`, `1.234`) still
//! breaks.

/// U+200B, an invisible break opportunity.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Label text with break opportunities inserted, plus the mapping between
/// character offsets in the original and the prepared string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedText {
    text: String,
    /// original char offset -> prepared char offset (len = original + 1)
    to_prepared: Vec<usize>,
    /// prepared char offset -> original char offset (len = prepared + 1)
    to_original: Vec<usize>,
}

/// Insert [`ZERO_WIDTH_SPACE`] after every `_` and `-`, and after `.` when
/// it is not followed by a digit, or is followed by at least three digits.
pub fn prepare_label_text(text: &str) -> PreparedText {
    let chars: Vec<char> = text.chars().collect();
    let mut prepared = String::with_capacity(text.len());
    let mut to_prepared = Vec::with_capacity(chars.len() + 1);
    let mut to_original = Vec::with_capacity(chars.len() + 1);

    let digit_at = |index: usize| chars.get(index).is_some_and(|c| c.is_ascii_digit());

    for (index, &c) in chars.iter().enumerate() {
        to_prepared.push(to_original.len());
        to_original.push(index);
        prepared.push(c);

        let breaks = match c {
            '_' | '-' => true,
            '.' => !digit_at(index + 1) || (digit_at(index + 2) && digit_at(index + 3)),
            _ => false,
        };

        if breaks {
            // The break belongs after `c`, so it maps to the next original offset.
            to_original.push(index + 1);
            prepared.push(ZERO_WIDTH_SPACE);
        }
    }

    to_prepared.push(to_original.len());
    to_original.push(chars.len());

    PreparedText {
        text: prepared,
        to_prepared,
        to_original,
    }
}

impl PreparedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the original text.
    pub fn original_len(&self) -> usize {
        self.to_prepared.len() - 1
    }

    /// Prepared char offset for an original char offset. Offsets past the
    /// end clamp to the end.
    pub fn to_prepared(&self, original: usize) -> usize {
        self.to_prepared[original.min(self.to_prepared.len() - 1)]
    }

    /// Original char offset for a prepared char offset. An inserted break
    /// maps to the character after it.
    pub fn to_original(&self, prepared: usize) -> usize {
        self.to_original[prepared.min(self.to_original.len() - 1)]
    }

    /// Number of break opportunities that were inserted.
    pub fn break_count(&self) -> usize {
        self.to_original.len() - self.to_prepared.len()
    }

    /// The prepared text with every inserted break shown as `marker`.
    pub fn with_visible_breaks(&self, marker: char) -> String {
        self.text
            .chars()
            .map(|c| if c == ZERO_WIDTH_SPACE { marker } else { c })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(text: &str) -> String {
        prepare_label_text(text).with_visible_breaks('|')
    }

    #[test]
    fn test_breaks_after_separators() {
        assert_eq!(shown("my_file-name.txt"), "my_|file-|name.|txt");
        assert_eq!(shown("plain"), "plain");
        assert_eq!(shown(""), "");
    }

    #[test]
    fn test_dot_digit_lookahead() {
        assert_eq!(shown("1.2"), "1.2");
        assert_eq!(shown("1.234"), "1.|234");
        assert_eq!(shown("1.23"), "1.23");
        assert_eq!(shown("192.168.1.1"), "192.|168.1.1");
        assert_eq!(shown("foo-1.2.3"), "foo-|1.2.3");
        // a trailing dot has no digit after it
        assert_eq!(shown("end."), "end.|");
    }

    #[test]
    fn test_offset_mapping() {
        let prepared = prepare_label_text("a-b");
        assert_eq!(prepared.as_str(), "a-\u{200B}b");
        assert_eq!(prepared.break_count(), 1);
        assert_eq!(prepared.original_len(), 3);

        assert_eq!(prepared.to_prepared(0), 0);
        assert_eq!(prepared.to_prepared(2), 3);
        assert_eq!(prepared.to_prepared(3), 4);
        assert_eq!(prepared.to_prepared(99), 4);

        assert_eq!(prepared.to_original(1), 1);
        assert_eq!(prepared.to_original(2), 2); // the break itself
        assert_eq!(prepared.to_original(3), 2);
        assert_eq!(prepared.to_original(4), 3);
    }

    #[test]
    fn test_multibyte_text() {
        let prepared = prepare_label_text("été_ü");
        assert_eq!(prepared.with_visible_breaks('|'), "été_|ü");
        assert_eq!(prepared.to_prepared(4), 5);
    }
}
