//! Concentric ring segments.

use std::f32::consts::TAU;

use super::canvas::{Canvas, VIEW_BOX};
use super::{hue, polygon_circle};
use crate::domain::entities::{
    Color, IdentityHash, ImageFormat, Point, Rotation, Shape, Transform,
};
use crate::domain::errors::RenderError;
use crate::domain::ports::IconGenerator;

const RINGS: usize = 3;
const SEGMENTS: usize = 8;
const STEPS_PER_SEGMENT: usize = 6;
const CORE_RADIUS: f32 = 10.0;
const RING_WIDTH: f32 = 10.0;
const RING_GAP: f32 = 3.0;

/// Ring-segment icon generator.
///
/// Each ring is split into eight arcs; a hash byte masks which arcs are drawn
/// and a nibble picks the ring's colour and quarter-turn rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rings;

impl Rings {
    /// Lays out the icon for `hash`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas(self, hash: &IdentityHash) -> Canvas {
        let hue = hue(hash, 0);
        let palette = [
            Color::from_hsl(hue, 0.6, 0.45),
            Color::from_hsl(hue + 120.0, 0.6, 0.5),
            Color::from_hsl(hue + 240.0, 0.55, 0.45),
            Color::from_hsl(hue, 0.35, 0.3),
        ];
        let center = Point::new(VIEW_BOX / 2.0, VIEW_BOX / 2.0);

        let mut canvas = Canvas::new().with_background(Color::from_hsl(hue, 0.3, 0.92));
        canvas.push(Shape::polygon(
            polygon_circle(center, CORE_RADIUS, 24),
            palette[usize::from(hash.nibble(9)) % palette.len()],
        ));

        for ring in 0..RINGS {
            let inner = (ring as f32).mul_add(RING_WIDTH + RING_GAP, CORE_RADIUS + RING_GAP);
            let outer = inner + RING_WIDTH;
            // a blank ring reads as a rendering fault, keep at least one arc
            let mask = hash.byte(2 + ring).max(1);
            let fill = palette[usize::from(hash.nibble(10 + ring)) % palette.len()];

            let arcs = (0..SEGMENTS)
                .filter(|segment| mask & (1 << segment) != 0)
                .map(|segment| Shape::polygon(sector(center, inner, outer, segment), fill))
                .collect();
            let rotation = Rotation::from_index(usize::from(hash.nibble(20 + ring)));
            canvas.push(
                Shape::composite(arcs)
                    .with_transform(Transform::translate(0.0, 0.0).rotated(rotation, center)),
            );
        }

        canvas
    }
}

impl IconGenerator for Rings {
    fn render(
        &self,
        hash: &IdentityHash,
        size: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.canvas(hash).encode(size, format)
    }
}

/// Annular sector covering one eighth of a ring.
#[allow(clippy::cast_precision_loss)]
fn sector(center: Point, inner: f32, outer: f32, segment: usize) -> Vec<Point> {
    let span = TAU / SEGMENTS as f32;
    let start = span * segment as f32;
    let at = |radius: f32, step: usize| {
        let angle = (span / STEPS_PER_SEGMENT as f32).mul_add(step as f32, start);
        Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        )
    };

    let mut points: Vec<Point> = (0..=STEPS_PER_SEGMENT).map(|s| at(outer, s)).collect();
    points.extend((0..=STEPS_PER_SEGMENT).rev().map(|s| at(inner, s)));
    points
}
