//! Color parsing utilities.
//!
//! Theme files spell colors the way CSS does. This module turns those
//! strings into `palette` colors and back into 8-bit channels for image
//! tinting.

use palette::{FromColor, Hsla, Srgba};

/// The color type used throughout the icon view: non-linear sRGB with alpha.
pub type Color = Srgba<f32>;

/// Parse a color string into an sRGBA color.
///
/// Supports the following formats:
/// - Hex colors: #RGB, #RRGGBB, #RRGGBBAA (with or without # prefix)
/// - RGB/RGBA: rgb(r, g, b), rgba(r, g, b, a)
/// - HSL/HSLA: hsl(h, s%, l%), hsla(h, s%, l%, a)
/// - Named colors: black, white, red, etc.
///
/// # Examples
///
/// ```
/// use iconview_core::color::parse_color;
///
/// let red = parse_color("#ff0000").unwrap();
/// let green = parse_color("rgb(0, 255, 0)").unwrap();
/// let blue = parse_color("hsla(240, 100%, 50%, 1.0)").unwrap();
/// let black = parse_color("black").unwrap();
/// # let _ = (red, green, blue, black);
/// ```
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    if value.eq_ignore_ascii_case("transparent") {
        return Some(Srgba::new(0.0, 0.0, 0.0, 0.0));
    }

    if value.starts_with("rgb") {
        return parse_rgb_color(value);
    }

    if value.starts_with("hsl") {
        return parse_hsl_color(value);
    }

    if let Some(color) = parse_hex_color(value) {
        return Some(color);
    }

    let (r, g, b) = match value.to_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(from_rgba8([r, g, b, 255]))
}

/// Build a color from 8-bit channels.
pub fn from_rgba8(channels: [u8; 4]) -> Color {
    Srgba::new(channels[0], channels[1], channels[2], channels[3]).into_format()
}

/// Convert a color to 8-bit channels, rounding each component.
pub fn to_rgba8(color: Color) -> [u8; 4] {
    let rgba: Srgba<u8> = color.into_format();
    [rgba.red, rgba.green, rgba.blue, rgba.alpha]
}

fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        3 => {
            let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
            Some(from_rgba8([expand(0)?, expand(1)?, expand(2)?, 255]))
        }
        6 => Some(from_rgba8([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255])),
        8 => Some(from_rgba8([
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        ])),
        _ => None,
    }
}

/// Parse RGB/RGBA color format
fn parse_rgb_color(value: &str) -> Option<Color> {
    let components = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = components.split(',').collect();
    if parts.len() < 3 {
        return None;
    }

    let r = parse_rgb_component(parts[0])?;
    let g = parse_rgb_component(parts[1])?;
    let b = parse_rgb_component(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => alpha.trim().parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(Srgba::new(r, g, b, a))
}

/// Parse HSL/HSLA color format (hue in degrees, saturation and lightness in percent)
fn parse_hsl_color(value: &str) -> Option<Color> {
    let content = value
        .strip_prefix("hsla(")
        .or_else(|| value.strip_prefix("hsl("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = content.split(',').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let h = parts[0].trim().parse::<f32>().ok()?;
    let s = parse_percentage(parts[1])?;
    let l = parse_percentage(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => alpha.trim().parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };

    let hsla: Hsla = Hsla::new(h, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0), a);
    Some(Srgba::from_color(hsla))
}

fn parse_percentage(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix('%').unwrap_or(value);
    number.trim().parse::<f32>().ok().map(|v| v / 100.0)
}

/// Parse a single RGB component which can be a number (0-255) or percentage
fn parse_rgb_component(value: &str) -> Option<f32> {
    let value = value.trim();

    if let Some(percent) = value.strip_suffix('%') {
        percent.parse::<f32>().ok().map(|v| (v / 100.0).clamp(0.0, 1.0))
    } else {
        value.parse::<u8>().ok().map(|v| v as f32 / 255.0)
    }
}
