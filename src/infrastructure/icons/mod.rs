//! Procedural icon generators and their registry.

mod canvas;
mod identicon;
mod registry;
mod retro;
mod rings;
mod silhouette;

pub use canvas::{Canvas, VIEW_BOX};
pub use identicon::Identicon;
pub use registry::{IconProvider, IconProviderRegistry};
pub use retro::Retro;
pub use rings::Rings;
pub use silhouette::Silhouette;

use std::f32::consts::TAU;

use crate::domain::entities::{IdentityHash, Point};

/// Hue in degrees taken from two consecutive hash bytes.
fn hue(hash: &IdentityHash, byte: usize) -> f32 {
    let value = (u16::from(hash.byte(byte)) << 8) | u16::from(hash.byte(byte + 1));
    f32::from(value) / f32::from(u16::MAX) * 360.0
}

/// Approximates a circle with a regular polygon of `segments` vertices.
#[allow(clippy::cast_precision_loss)]
fn polygon_circle(center: Point, radius: f32, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            Point::new(
                radius.mul_add(angle.cos(), center.x),
                radius.mul_add(angle.sin(), center.y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_range() {
        let zero = IdentityHash::parse(&"0".repeat(64)).unwrap();
        let full = IdentityHash::parse(&"f".repeat(64)).unwrap();
        assert!(hue(&zero, 0).abs() < f32::EPSILON);
        assert!((hue(&full, 0) - 360.0).abs() < 0.01);
    }

    #[test]
    fn test_polygon_circle_radius() {
        let points = polygon_circle(Point::new(50.0, 50.0), 10.0, 8);
        assert_eq!(points.len(), 8);
        for p in points {
            let distance = (p.x - 50.0).hypot(p.y - 50.0);
            assert!((distance - 10.0).abs() < 0.001);
        }
    }
}
