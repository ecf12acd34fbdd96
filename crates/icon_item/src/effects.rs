//! Pixel effects for highlighted icons. Alpha is never changed, and the
//! source image is never modified.

use image::{DynamicImage, Pixel};

/// Brighten every color channel: `c + 24 + c / 8`, saturating.
pub fn spotlight(image: &DynamicImage) -> DynamicImage {
    map_color_channels(image, |_, value| {
        let value = value as u32;
        (value + 24 + (value >> 3)).min(255) as u8
    })
}

/// Multiply every color channel by `tint` (`c * t / 256`).
pub fn colorize(image: &DynamicImage, tint: [u8; 3]) -> DynamicImage {
    map_color_channels(image, |channel, value| ((value as u32 * tint[channel] as u32) >> 8) as u8)
}

fn map_color_channels(image: &DynamicImage, f: impl Fn(usize, u8) -> u8) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(buffer) => {
            let mut out = buffer.clone();
            for pixel in out.pixels_mut() {
                for (channel, value) in pixel.channels_mut().iter_mut().enumerate() {
                    *value = f(channel, *value);
                }
            }
            DynamicImage::ImageRgb8(out)
        }
        other => {
            let mut out = other.to_rgba8();
            for pixel in out.pixels_mut() {
                for (channel, value) in pixel.channels_mut().iter_mut().take(3).enumerate() {
                    *value = f(channel, *value);
                }
            }
            DynamicImage::ImageRgba8(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_spotlight_saturates_and_keeps_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 80, 240, 77])));
        let lit = spotlight(&image).to_rgba8();
        // 0 -> 24, 80 -> 80 + 24 + 10, 240 saturates
        assert_eq!(lit.get_pixel(1, 1).0, [24, 114, 255, 77]);
        // the source is untouched
        assert_eq!(image.to_rgba8().get_pixel(0, 0).0, [0, 80, 240, 77]);
    }

    #[test]
    fn test_colorize_multiplies_channels() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([200, 128, 255])));
        let tinted = colorize(&image, [128, 255, 0]);
        assert!(matches!(tinted, DynamicImage::ImageRgb8(_)));
        assert_eq!(tinted.to_rgb8().get_pixel(0, 0).0, [100, 127, 0]);
    }
}
