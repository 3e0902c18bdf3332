//! Mirrored block pattern in the classic pixel style.

use super::canvas::{Canvas, VIEW_BOX};
use super::hue;
use crate::domain::entities::{Color, IdentityHash, ImageFormat, Point, Shape};
use crate::domain::errors::RenderError;
use crate::domain::ports::IconGenerator;

const GRID: u8 = 5;
const MARGIN: f32 = 10.0;
const BLOCK: f32 = (VIEW_BOX - 2.0 * MARGIN) / 5.0;

/// Vertically mirrored 5x5 block generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retro;

impl Retro {
    /// Lays out the icon for `hash`.
    #[must_use]
    pub fn canvas(self, hash: &IdentityHash) -> Canvas {
        let fill = Color::from_hsl(hue(hash, 28), 0.55, 0.5);
        let mut canvas = Canvas::new().with_background(Color::rgb(240, 240, 240));

        for row in 0..GRID {
            for column in 0..=GRID / 2 {
                let nibble = hash.nibble(usize::from(row * 3 + column));
                if nibble % 2 != 0 {
                    continue;
                }
                canvas.push(block(column, row, fill));
                let mirror = GRID - 1 - column;
                if mirror != column {
                    canvas.push(block(mirror, row, fill));
                }
            }
        }

        canvas
    }
}

impl IconGenerator for Retro {
    fn render(
        &self,
        hash: &IdentityHash,
        size: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.canvas(hash).encode(size, format)
    }
}

fn block(column: u8, row: u8, fill: Color) -> Shape {
    let x = f32::from(column).mul_add(BLOCK, MARGIN);
    let y = f32::from(row).mul_add(BLOCK, MARGIN);
    Shape::polygon(
        vec![
            Point::new(x, y),
            Point::new(x + BLOCK, y),
            Point::new(x + BLOCK, y + BLOCK),
            Point::new(x, y + BLOCK),
        ],
        fill,
    )
}
