//! Head-and-shoulders placeholder figure.

use std::f32::consts::PI;

use super::canvas::{Canvas, VIEW_BOX};
use super::{hue, polygon_circle};
use crate::domain::entities::{Color, IdentityHash, ImageFormat, Point, Shape};
use crate::domain::errors::RenderError;
use crate::domain::ports::IconGenerator;

const HEAD_CENTER: Point = Point::new(VIEW_BOX / 2.0, 38.0);
const HEAD_RADIUS: f32 = 17.0;
const BODY_RADIUS_X: f32 = 34.0;
const BODY_RADIUS_Y: f32 = 36.0;
const BODY_STEPS: usize = 24;

/// Silhouette generator. The figure is fixed; only the colours vary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette;

impl Silhouette {
    /// Lays out the icon for `hash`.
    #[must_use]
    pub fn canvas(self, hash: &IdentityHash) -> Canvas {
        let hue = hue(hash, 0);
        let lightness = f32::from(hash.nibble(4)) / 15.0;
        let background = Color::from_hsl(hue, 0.45, lightness.mul_add(0.1, 0.75));
        let figure = Color::from_hsl(hue, 0.35, lightness.mul_add(0.1, 0.3));

        let mut canvas = Canvas::new().with_background(background);
        canvas.push(Shape::composite(vec![
            Shape::polygon(polygon_circle(HEAD_CENTER, HEAD_RADIUS, 32), figure),
            Shape::polygon(shoulders(), figure),
        ]));
        canvas
    }
}

impl IconGenerator for Silhouette {
    fn render(
        &self,
        hash: &IdentityHash,
        size: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.canvas(hash).encode(size, format)
    }
}

/// Upper half ellipse resting on the bottom edge.
#[allow(clippy::cast_precision_loss)]
fn shoulders() -> Vec<Point> {
    let center = Point::new(VIEW_BOX / 2.0, VIEW_BOX);
    (0..=BODY_STEPS)
        .map(|step| {
            let angle = PI + PI * step as f32 / BODY_STEPS as f32;
            Point::new(
                BODY_RADIUS_X.mul_add(angle.cos(), center.x),
                BODY_RADIUS_Y.mul_add(angle.sin(), center.y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_is_fixed_colours_vary() {
        let a = IdentityHash::compute("salt", "a@example.com");
        let b = IdentityHash::compute("salt", "b@example.com");

        let svg_a = Silhouette.canvas(&a).to_svg(64);
        let svg_b = Silhouette.canvas(&b).to_svg(64);
        assert_eq!(svg_a.matches("<polygon").count(), 2);
        assert_ne!(svg_a, svg_b);

        let strip = |svg: &str| svg.split("fill=").count();
        assert_eq!(strip(&svg_a), strip(&svg_b));
    }

    #[test]
    fn test_raster_head_and_background() {
        let hash = IdentityHash::compute("salt", "someone@example.com");
        let canvas = Silhouette.canvas(&hash);
        let img = canvas.rasterize(100);

        let head = img.get_pixel(50, 38);
        let corner = img.get_pixel(1, 1);
        assert_ne!(head, corner);
        assert_eq!(head, img.get_pixel(50, 95));
    }

    #[test]
    fn test_deterministic_png() {
        let hash = IdentityHash::compute("salt", "someone@example.com");
        assert_eq!(
            Silhouette.render(&hash, 40, ImageFormat::Png).unwrap(),
            Silhouette.render(&hash, 40, ImageFormat::Png).unwrap()
        );
    }
}
