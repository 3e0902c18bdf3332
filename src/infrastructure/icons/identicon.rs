//! Polygon-grid identicon.
//!
//! The icon is a 4x4 grid split into three rings: eight side cells, four
//! corner cells and four centre cells. Each ring repeats one shape, rotated a
//! quarter turn per position so the icon is rotationally symmetric.

use super::canvas::{Canvas, VIEW_BOX};
use super::{hue, polygon_circle};
use crate::domain::entities::{
    Color, IdentityHash, ImageFormat, Point, Rotation, Shape, Transform,
};
use crate::domain::errors::RenderError;
use crate::domain::ports::IconGenerator;

const PADDING: f32 = 8.0;
const CELL: f32 = (VIEW_BOX - 2.0 * PADDING) / 4.0;

type Template = fn(f32) -> Vec<Point>;

const SIDE_CELLS: [(u8, u8); 8] = [
    (1, 0),
    (2, 0),
    (3, 1),
    (3, 2),
    (2, 3),
    (1, 3),
    (0, 2),
    (0, 1),
];
const CORNER_CELLS: [(u8, u8); 4] = [(0, 0), (3, 0), (3, 3), (0, 3)];
const CENTER_CELLS: [(u8, u8); 4] = [(1, 1), (2, 1), (2, 2), (1, 2)];

const OUTER_TEMPLATES: [Template; 5] = [
    |c| vec![Point::new(0.0, 0.0), Point::new(c, 0.0), Point::new(0.0, c)],
    |c| {
        vec![
            Point::new(0.0, c / 2.0),
            Point::new(c, c),
            Point::new(0.0, c),
        ]
    },
    |c| {
        vec![
            Point::new(c / 2.0, 0.0),
            Point::new(c, c / 2.0),
            Point::new(c / 2.0, c),
            Point::new(0.0, c / 2.0),
        ]
    },
    |c| polygon_circle(Point::new(c / 2.0, c / 2.0), c / 3.0, 12),
    |c| {
        vec![
            Point::new(0.0, 0.0),
            Point::new(c, 0.0),
            Point::new(c, c),
            Point::new(c / 2.0, c),
            Point::new(c / 2.0, c / 2.0),
            Point::new(0.0, c / 2.0),
        ]
    },
];

const CENTER_TEMPLATES: [Template; 6] = [
    |c| {
        let k = c * 0.1;
        vec![
            Point::new(k, k),
            Point::new(c - k, k),
            Point::new(c - k, c - k),
            Point::new(k, c - k),
        ]
    },
    |c| vec![Point::new(0.0, 0.0), Point::new(c, 0.0), Point::new(c, c)],
    |c| {
        vec![
            Point::new(0.0, 0.0),
            Point::new(c, 0.0),
            Point::new(c, c * 0.6),
            Point::new(c * 0.6, c),
            Point::new(0.0, c),
        ]
    },
    |c| {
        vec![
            Point::new(0.0, 0.0),
            Point::new(c, 0.0),
            Point::new(c, c / 2.0),
            Point::new(0.0, c / 2.0),
        ]
    },
    |c| {
        vec![
            Point::new(0.0, 0.0),
            Point::new(c, 0.0),
            Point::new(c / 2.0, c / 2.0),
            Point::new(c, c),
            Point::new(0.0, c),
        ]
    },
    |c| polygon_circle(Point::new(c / 2.0, c / 2.0), c * 0.4, 16),
];

/// Polygon-grid identicon generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identicon;

impl Identicon {
    /// Lays out the icon for `hash`.
    #[must_use]
    pub fn canvas(self, hash: &IdentityHash) -> Canvas {
        let hue = hue(hash, 30);
        let palette = [
            Color::from_hsl(hue, 0.0, 0.3),
            Color::from_hsl(hue, 0.5, 0.55),
            Color::from_hsl(hue, 0.5, 0.8),
            Color::from_hsl(hue, 0.0, 0.85),
            Color::from_hsl(hue, 0.5, 0.35),
        ];
        let colors = pick_colors(hash, &palette);

        let side = OUTER_TEMPLATES[usize::from(hash.nibble(2)) % OUTER_TEMPLATES.len()];
        let corner = OUTER_TEMPLATES[usize::from(hash.nibble(4)) % OUTER_TEMPLATES.len()];
        let center = CENTER_TEMPLATES[usize::from(hash.nibble(1)) % CENTER_TEMPLATES.len()];

        let rings = [
            ring(&SIDE_CELLS, side, colors[0], usize::from(hash.nibble(3)), 2),
            ring(&CORNER_CELLS, corner, colors[1], usize::from(hash.nibble(5)), 1),
            ring(&CENTER_CELLS, center, colors[2], usize::from(hash.nibble(6)), 1),
        ];

        let mut canvas = Canvas::new().with_background(Color::rgb(255, 255, 255));
        canvas.push(
            Shape::composite(rings.into()).with_transform(Transform::translate(PADDING, PADDING)),
        );
        canvas
    }
}

impl IconGenerator for Identicon {
    fn render(
        &self,
        hash: &IdentityHash,
        size: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.canvas(hash).encode(size, format)
    }
}

/// Places `template` in every cell, advancing the rotation every `per_turn` cells.
fn ring(
    cells: &[(u8, u8)],
    template: Template,
    fill: Color,
    rotation: usize,
    per_turn: usize,
) -> Shape {
    let pivot = Point::new(CELL / 2.0, CELL / 2.0);
    let children = cells
        .iter()
        .enumerate()
        .map(|(index, &(column, row))| {
            let transform = Transform::translate(f32::from(column) * CELL, f32::from(row) * CELL)
                .rotated(Rotation::from_index(rotation + index / per_turn), pivot);
            Shape::polygon(template(CELL), fill).with_transform(transform)
        })
        .collect();

    Shape::composite(children)
}

/// Picks three palette entries, never the same one twice and never both greys.
fn pick_colors(hash: &IdentityHash, palette: &[Color; 5]) -> [Color; 3] {
    const GREYS: [usize; 2] = [0, 3];

    let mut chosen: Vec<usize> = Vec::with_capacity(3);
    for offset in 0..3 {
        let mut index = usize::from(hash.nibble(8 + offset)) % palette.len();
        loop {
            let both_greys =
                GREYS.contains(&index) && chosen.iter().any(|c| GREYS.contains(c));
            if !chosen.contains(&index) && !both_greys {
                break;
            }
            index = (index + 1) % palette.len();
        }
        chosen.push(index);
    }

    [palette[chosen[0]], palette[chosen[1]], palette[chosen[2]]]
}
