use std::fmt;

/// Size used when a font string does not name one.
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

const DEFAULT_FAMILY: &str = "Sans";

/// A font family and point size, parsed from strings like `"Sans 10"` or
/// `"DejaVu Sans Mono 9.5"`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescription {
    pub family: String,
    pub size: f32,
}

impl FontDescription {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Parse a `"Family [Style...] Size"` string. The size is the trailing
    /// number; anything before it is the family.
    pub fn parse(description: &str) -> Self {
        let mut words: Vec<&str> = description.split_whitespace().collect();

        let size = match words.last().and_then(|last| last.parse::<f32>().ok()) {
            Some(size) if size > 0.0 => {
                words.pop();
                size
            }
            _ => DEFAULT_FONT_SIZE,
        };

        let family = if words.is_empty() {
            DEFAULT_FAMILY.to_string()
        } else {
            words.join(" ")
        };

        Self { family, size }
    }

    /// The same family, `delta` points larger (or smaller). Never shrinks
    /// below one point.
    pub fn with_size_delta(&self, delta: f32) -> Self {
        Self {
            family: self.family.clone(),
            size: (self.size + delta).max(1.0),
        }
    }
}

impl Default for FontDescription {
    fn default() -> Self {
        Self::new(DEFAULT_FAMILY, DEFAULT_FONT_SIZE)
    }
}

impl fmt::Display for FontDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family_and_size() {
        let font = FontDescription::parse("DejaVu Sans Mono 9.5");
        assert_eq!(font.family, "DejaVu Sans Mono");
        assert_eq!(font.size, 9.5);

        let embedded = FontDescription::parse("monospace 6");
        assert_eq!(embedded, FontDescription::new("monospace", 6.0));
    }

    #[test]
    fn test_parse_without_size_uses_default() {
        assert_eq!(FontDescription::parse("Cantarell").size, DEFAULT_FONT_SIZE);
        assert_eq!(FontDescription::parse("").family, "Sans");
    }

    #[test]
    fn test_size_delta_is_clamped() {
        let font = FontDescription::new("Sans", 10.0);
        assert_eq!(font.with_size_delta(-2.0).size, 8.0);
        assert_eq!(font.with_size_delta(-20.0).size, 1.0);
        assert_eq!(font.to_string(), "Sans 10");
    }
}
