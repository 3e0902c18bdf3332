//! Vector primitives used by the procedural icon generators.

use std::fmt::Write as _;

/// RGB fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a colour from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a colour from hue (degrees), saturation and lightness in `0..=1`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names
    )]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Returns the `#rrggbb` representation.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A point in canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rotation restricted to quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise.
    Quarter,
    /// 180 degrees.
    Half,
    /// 270 degrees clockwise.
    ThreeQuarters,
}

impl Rotation {
    /// Maps any integer onto a quarter turn.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::None,
            1 => Self::Quarter,
            2 => Self::Half,
            _ => Self::ThreeQuarters,
        }
    }

    /// Rotation angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarters => 270,
        }
    }

    /// Exact (cos, sin) pair.
    const fn cos_sin(self) -> (f32, f32) {
        match self {
            Self::None => (1.0, 0.0),
            Self::Quarter => (0.0, 1.0),
            Self::Half => (-1.0, 0.0),
            Self::ThreeQuarters => (0.0, -1.0),
        }
    }
}

/// Translation followed by a quarter-turn rotation around a local pivot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    /// Translation applied after rotation.
    pub translate: Point,
    /// Rotation around `pivot`.
    pub rotation: Rotation,
    /// Rotation pivot in local coordinates.
    pub pivot: Point,
}

impl Transform {
    /// Pure translation.
    #[must_use]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            translate: Point::new(x, y),
            rotation: Rotation::None,
            pivot: Point::new(0.0, 0.0),
        }
    }

    /// Adds a rotation around `pivot`.
    #[must_use]
    pub const fn rotated(mut self, rotation: Rotation, pivot: Point) -> Self {
        self.rotation = rotation;
        self.pivot = pivot;
        self
    }

    fn is_identity(&self) -> bool {
        self.rotation == Rotation::None && self.translate == Point::new(0.0, 0.0)
    }

    fn to_affine(self) -> Affine {
        let (cos, sin) = self.rotation.cos_sin();
        let Point { x: px, y: py } = self.pivot;
        // rotate around pivot, then translate
        Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: px - cos * px + sin * py + self.translate.x,
            f: py - sin * px - cos * py + self.translate.y,
        }
    }

    fn write_attr(&self, out: &mut String) {
        if self.is_identity() {
            return;
        }
        out.push_str(" transform=\"");
        let _ = write!(
            out,
            "translate({} {})",
            fmt_num(self.translate.x),
            fmt_num(self.translate.y)
        );
        if self.rotation != Rotation::None {
            let _ = write!(
                out,
                " rotate({} {} {})",
                self.rotation.degrees(),
                fmt_num(self.pivot.x),
                fmt_num(self.pivot.y)
            );
        }
        out.push('"');
    }
}

/// 2D affine matrix `[a c e; b d f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Uniform scale.
    #[must_use]
    pub const fn scale(factor: f32) -> Self {
        Self {
            a: factor,
            b: 0.0,
            c: 0.0,
            d: factor,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Returns `self * inner`, i.e. applies `inner` first.
    #[must_use]
    pub fn then_inner(self, inner: Self) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Maps a point.
    #[must_use]
    pub fn apply(self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// A filled polygon in absolute canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPolygon {
    /// Vertices after all transforms.
    pub points: Vec<Point>,
    /// Fill colour.
    pub fill: Color,
}

/// A vector primitive or a group of primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A filled polygon.
    Polygon {
        /// Vertices in local coordinates.
        points: Vec<Point>,
        /// Fill colour.
        fill: Color,
        /// Local transform.
        transform: Transform,
    },
    /// Children sharing one outer transform.
    Composite {
        /// Nested shapes, painted in order.
        children: Vec<Shape>,
        /// Transform applied to every child.
        transform: Transform,
    },
}

impl Shape {
    /// Creates an untransformed polygon.
    #[must_use]
    pub const fn polygon(points: Vec<Point>, fill: Color) -> Self {
        Self::Polygon {
            points,
            fill,
            transform: Transform::translate(0.0, 0.0),
        }
    }

    /// Creates an untransformed group.
    #[must_use]
    pub const fn composite(children: Vec<Self>) -> Self {
        Self::Composite {
            children,
            transform: Transform::translate(0.0, 0.0),
        }
    }

    /// Replaces the shape's own transform.
    #[must_use]
    pub fn with_transform(mut self, value: Transform) -> Self {
        match &mut self {
            Self::Polygon { transform, .. } | Self::Composite { transform, .. } => {
                *transform = value;
            }
        }
        self
    }

    /// Appends SVG markup for this shape.
    pub fn write_svg(&self, out: &mut String) {
        match self {
            Self::Polygon {
                points,
                fill,
                transform,
            } => {
                out.push_str("<polygon points=\"");
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{},{}", fmt_num(p.x), fmt_num(p.y));
                }
                let _ = write!(out, "\" fill=\"{}\"", fill.to_hex());
                transform.write_attr(out);
                out.push_str("/>");
            }
            Self::Composite {
                children,
                transform,
            } => {
                out.push_str("<g");
                transform.write_attr(out);
                out.push('>');
                for child in children {
                    child.write_svg(out);
                }
                out.push_str("</g>");
            }
        }
    }

    /// Resolves every transform and returns polygons in paint order.
    #[must_use]
    pub fn flatten(&self, outer: Affine) -> Vec<FlatPolygon> {
        let mut polygons = Vec::new();
        self.flatten_into(outer, &mut polygons);
        polygons
    }

    fn flatten_into(&self, outer: Affine, out: &mut Vec<FlatPolygon>) {
        match self {
            Self::Polygon {
                points,
                fill,
                transform,
            } => {
                let matrix = outer.then_inner(transform.to_affine());
                out.push(FlatPolygon {
                    points: points.iter().map(|p| matrix.apply(*p)).collect(),
                    fill: *fill,
                });
            }
            Self::Composite {
                children,
                transform,
            } => {
                let matrix = outer.then_inner(transform.to_affine());
                for child in children {
                    child.flatten_into(matrix, out);
                }
            }
        }
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
#[must_use]
pub fn fmt_num(value: f32) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
