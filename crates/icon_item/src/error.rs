use image::ColorType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconItemError {
    #[error("unsupported icon image format {0:?}, expected 8-bit RGB or RGBA")]
    UnsupportedImageFormat(ColorType),
}
