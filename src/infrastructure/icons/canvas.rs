//! Square drawing surface shared by every generator.
//!
//! Shapes are laid out in a fixed coordinate space of [`VIEW_BOX`] units and
//! scaled to the requested pixel size on output.

use std::fmt::Write as _;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::domain::entities::{
    Affine, Color, FlatPolygon, ImageFormat, MAX_AVATAR_SIZE, Shape,
};
use crate::domain::errors::RenderError;
use crate::infrastructure::imaging;

/// Edge length of the canvas coordinate space.
pub const VIEW_BOX: f32 = 100.0;

/// Vector canvas with an optional background.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    background: Option<Color>,
    shapes: Vec<Shape>,
}

impl Canvas {
    /// Creates an empty, transparent canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the whole canvas before any shape is painted.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Appends a shape, painted above earlier ones.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Serializes the canvas as an SVG document of `size` pixels.
    #[must_use]
    pub fn to_svg(&self, size: u32) -> String {
        let mut svg = String::with_capacity(256 + self.shapes.len() * 96);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
             viewBox=\"0 0 {VIEW_BOX} {VIEW_BOX}\">"
        );
        if let Some(background) = self.background {
            let _ = write!(
                svg,
                "<rect width=\"{VIEW_BOX}\" height=\"{VIEW_BOX}\" fill=\"{}\"/>",
                background.to_hex()
            );
        }
        for shape in &self.shapes {
            shape.write_svg(&mut svg);
        }
        svg.push_str("</svg>");
        svg
    }

    /// Rasterizes the canvas into a `size` x `size` bitmap.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rasterize(&self, size: u32) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        if let Some(background) = self.background {
            for pixel in img.pixels_mut() {
                *pixel = opaque(background);
            }
        }

        let scale = Affine::scale(size as f32 / VIEW_BOX);
        for shape in &self.shapes {
            for polygon in shape.flatten(scale) {
                fill_polygon(&mut img, &polygon);
            }
        }
        img
    }

    /// Encodes the canvas as `format`.
    ///
    /// # Errors
    /// Returns error if the size is zero or above [`MAX_AVATAR_SIZE`], or the
    /// bitmap encoder fails.
    pub fn encode(&self, size: u32, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        if size == 0 || size > MAX_AVATAR_SIZE {
            return Err(RenderError::InvalidSize { size });
        }

        match format {
            ImageFormat::Svg => Ok(self.to_svg(size).into_bytes()),
            _ => imaging::encode(&DynamicImage::ImageRgba8(self.rasterize(size)), format),
        }
    }
}

const fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Even-odd scanline fill sampling pixel centres.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn fill_polygon(img: &mut RgbaImage, polygon: &FlatPolygon) {
    let points = &polygon.points;
    if points.len() < 3 {
        return;
    }

    let width = img.width() as f32;
    let height = img.height() as f32;
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let row_start = (min_y - 0.5).ceil().clamp(0.0, height) as u32;
    let row_end = (max_y - 0.5).ceil().clamp(0.0, height) as u32;
    let color = opaque(polygon.fill);

    let mut crossings = Vec::with_capacity(points.len());
    for row in row_start..row_end {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample_y && b.y > sample_y) || (b.y <= sample_y && a.y > sample_y) {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().clamp(0.0, width) as u32;
            let end = (span[1] - 0.5).ceil().clamp(0.0, width) as u32;
            for column in start..end {
                img.put_pixel(column, row, color);
            }
        }
    }
}
