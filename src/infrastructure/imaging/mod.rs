//! Bitmap decoding, resizing and encoding.

use std::io::Cursor;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::trace;

use crate::domain::entities::{ImageFormat, MAX_AVATAR_SIZE};
use crate::domain::errors::RenderError;

/// Encodes `img` in a bitmap `format`.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
///
/// # Errors
/// Returns error for SVG or if the encoder fails.
pub fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
    let Some(raster) = format.to_raster() else {
        return Err(RenderError::Unsupported { format });
    };

    let mut buffer = Cursor::new(Vec::new());
    let written = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buffer, raster),
        _ => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, raster),
    };
    written.map_err(|e| RenderError::encode(format, e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Decodes `bytes`, crops them to a centred square and scales to `size`.
///
/// # Errors
/// Returns error if the size is zero or above [`MAX_AVATAR_SIZE`], or if
/// decoding or encoding fails.
pub fn resize_square(bytes: &[u8], size: u32, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
    if size == 0 || size > MAX_AVATAR_SIZE {
        return Err(RenderError::InvalidSize { size });
    }

    let img = image::load_from_memory(bytes).map_err(|e| RenderError::decode(e.to_string()))?;
    trace!(
        width = img.width(),
        height = img.height(),
        size,
        "Resizing source image"
    );

    let resized = if img.width() == size && img.height() == size {
        img
    } else {
        img.resize_to_fill(size, size, FilterType::Lanczos3)
    };

    encode(&resized, format)
}
