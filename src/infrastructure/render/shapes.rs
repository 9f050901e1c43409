//! Shape geometry emitted as SVG path data.
//!
//! Everything is expressed in module units on the full canvas, quiet zone
//! included, so `(0, 0)` is the top-left corner of the image.

use std::fmt::Write as _;

use crate::domain::entities::{EyeStyle, ModuleStyle};

use super::matrix::{FINDER_SIZE, QrMatrix};

/// Corner radius for rounded modules, as a fraction of the module size.
const ROUNDED_RADIUS: f64 = 1.0 / 3.0;

/// A filled region in module coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    RoundedRect { x: f64, y: f64, w: f64, h: f64, r: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    /// Square outline of side `size` with a stroke of `thickness`.
    SquareRing { x: f64, y: f64, size: f64, thickness: f64 },
    /// Annulus between `inner` and `outer` radii.
    CircleRing { cx: f64, cy: f64, outer: f64, inner: f64 },
}

impl Primitive {
    /// Appends SVG path data. Rings emit two sub-paths and rely on the
    /// `evenodd` fill rule for their hole.
    pub fn write_path(&self, out: &mut String) {
        match *self {
            Primitive::Rect { x, y, w, h } => rect_path(out, x, y, w, h),
            Primitive::RoundedRect { x, y, w, h, r } => {
                let _ = write!(
                    out,
                    "M{} {}h{}a{r} {r} 0 0 1 {r} {r}v{}a{r} {r} 0 0 1 {nr} {r}h{}a{r} {r} 0 0 1 {nr} {nr}v{}a{r} {r} 0 0 1 {r} {nr}z",
                    num(x + r),
                    num(y),
                    num(w - 2.0 * r),
                    num(h - 2.0 * r),
                    num(-(w - 2.0 * r)),
                    num(-(h - 2.0 * r)),
                    r = num(r),
                    nr = num(-r),
                );
            }
            Primitive::Circle { cx, cy, r } => circle_path(out, cx, cy, r),
            Primitive::SquareRing {
                x,
                y,
                size,
                thickness,
            } => {
                rect_path(out, x, y, size, size);
                let inner = size - 2.0 * thickness;
                rect_path(out, x + thickness, y + thickness, inner, inner);
            }
            Primitive::CircleRing {
                cx,
                cy,
                outer,
                inner,
            } => {
                circle_path(out, cx, cy, outer);
                circle_path(out, cx, cy, inner);
            }
        }
    }
}

fn rect_path(out: &mut String, x: f64, y: f64, w: f64, h: f64) {
    let _ = write!(
        out,
        "M{} {}h{}v{}h{}z",
        num(x),
        num(y),
        num(w),
        num(h),
        num(-w)
    );
}

fn circle_path(out: &mut String, cx: f64, cy: f64, r: f64) {
    let _ = write!(
        out,
        "M{} {}a{r} {r} 0 1 0 {d} 0a{r} {r} 0 1 0 {nd} 0z",
        num(cx - r),
        num(cy),
        r = num(r),
        d = num(2.0 * r),
        nd = num(-2.0 * r),
    );
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Primitive drawn for a dark body module whose cell starts at `(x, y)`.
pub fn module_primitive(style: ModuleStyle, x: f64, y: f64) -> Primitive {
    match style {
        ModuleStyle::Square => Primitive::Rect { x, y, w: 1.0, h: 1.0 },
        ModuleStyle::Dots => Primitive::Circle {
            cx: x + 0.5,
            cy: y + 0.5,
            r: 0.5,
        },
        ModuleStyle::Rounded => Primitive::RoundedRect {
            x,
            y,
            w: 1.0,
            h: 1.0,
            r: ROUNDED_RADIUS,
        },
    }
}

/// Primitives for one finder pattern whose 7x7 box starts at `(x, y)`.
pub fn eye_primitives(style: EyeStyle, x: f64, y: f64) -> Vec<Primitive> {
    let size = FINDER_SIZE as f64;
    let center = size / 2.0;

    match style {
        EyeStyle::Square => vec![
            Primitive::SquareRing {
                x,
                y,
                size,
                thickness: 1.0,
            },
            Primitive::Rect {
                x: x + 2.0,
                y: y + 2.0,
                w: 3.0,
                h: 3.0,
            },
        ],
        EyeStyle::Rounded => vec![
            Primitive::CircleRing {
                cx: x + center,
                cy: y + center,
                outer: center,
                inner: center - 1.0,
            },
            Primitive::Circle {
                cx: x + center,
                cy: y + center,
                r: 1.5,
            },
        ],
        EyeStyle::Leaf => {
            let mut parts = vec![Primitive::SquareRing {
                x,
                y,
                size,
                thickness: 1.0,
            }];
            for row in 2..5 {
                for col in 2..5 {
                    parts.push(Primitive::RoundedRect {
                        x: x + col as f64,
                        y: y + row as f64,
                        w: 1.0,
                        h: 1.0,
                        r: ROUNDED_RADIUS,
                    });
                }
            }
            parts
        }
    }
}

/// One finder pattern placed on the canvas.
#[derive(Debug, Clone)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub parts: Vec<Primitive>,
}

/// Styled layout of a whole symbol, quiet zone included.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Canvas side length in modules.
    pub dimension: usize,
    /// Body primitive per canvas cell, row-major; `None` for light cells,
    /// quiet zone, and finder areas.
    pub cells: Vec<Option<Primitive>>,
    pub eyes: Vec<Eye>,
}

impl Scene {
    pub fn build(
        matrix: &QrMatrix,
        margin: usize,
        module_style: ModuleStyle,
        eye_style: EyeStyle,
    ) -> Self {
        let dimension = matrix.width() + 2 * margin;
        let mut cells = vec![None; dimension * dimension];

        for y in 0..matrix.width() {
            for x in 0..matrix.width() {
                if matrix.is_dark(x, y) && !matrix.in_finder(x, y) {
                    let (cx, cy) = (x + margin, y + margin);
                    cells[cy * dimension + cx] =
                        Some(module_primitive(module_style, cx as f64, cy as f64));
                }
            }
        }

        let eyes = matrix
            .finder_origins()
            .iter()
            .map(|&(ox, oy)| {
                let (x, y) = ((ox + margin) as f64, (oy + margin) as f64);
                Eye {
                    x,
                    y,
                    parts: eye_primitives(eye_style, x, y),
                }
            })
            .collect();

        Self {
            dimension,
            cells,
            eyes,
        }
    }

    pub fn body_primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.cells.iter().flatten()
    }
}
