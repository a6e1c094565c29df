//! Geometry helpers: points, rectangles, data bounds, linear scales, and text
//! size estimation.
//!
//! Everything here is pure. The engines rebuild their derived geometry from
//! these functions whenever data, size, or the fixed-ratio toggle changes.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CHAR_WIDTH;

/// A point in data, surface, or layer space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `pt` lies inside the rectangle grown by `slop` on every side.
    #[must_use]
    pub fn contains(&self, pt: Point, slop: f64) -> bool {
        pt.x >= self.x - slop
            && pt.x <= self.x + self.width + slop
            && pt.y >= self.y - slop
            && pt.y <= self.y + self.height + slop
    }
}

/// Axis-aligned data bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    /// The unit square, used when there is no data.
    fn default() -> Self {
        Self { min_x: 0.0, min_y: 0.0, max_x: 1.0, max_y: 1.0 }
    }
}

/// Exact min/max over `points`, or the unit square when there are none.
#[must_use]
pub fn compute_bounds<I>(points: I) -> Bounds
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Bounds::default();
    };
    iter.fold(
        Bounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y },
        |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        },
    )
}

/// Smallest square (sharing one min and one max across both axes) covering `bounds`.
#[must_use]
pub fn square_bounds(bounds: Bounds) -> Bounds {
    let min = bounds.min_x.min(bounds.min_y);
    let max = bounds.max_x.max(bounds.max_y);
    Bounds { min_x: min, min_y: min, max_x: max, max_y: max }
}

/// Affine mapping from a domain interval onto a range interval.
///
/// Ranges may be inverted (`r0 > r1`), which is how the y axis grows upward in
/// data space and downward in pixel space. A collapsed domain maps every value
/// to the middle of the range instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self { domain: (0.0, 1.0), range: (0.0, 1.0) }
    }
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = (d0, d1);
    }

    pub fn set_range(&mut self, r0: f64, r1: f64) {
        self.range = (r0, r1);
    }

    /// Map a domain value into the range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        interpolate(self.domain, self.range, value)
    }

    /// Map a range value back into the domain.
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        interpolate(self.range, self.domain, value)
    }
}

fn interpolate(from: (f64, f64), to: (f64, f64), value: f64) -> f64 {
    let span = from.1 - from.0;
    let t = if span == 0.0 { 0.5 } else { (value - from.0) / span };
    to.0 + t * (to.1 - to.0)
}

/// Relative glyph widths for lowercase latin letters.
const CHAR_WIDTHS: [(char, f64); 26] = [
    ('a', 0.527),
    ('b', 0.57),
    ('c', 0.461),
    ('d', 0.57),
    ('e', 0.517),
    ('f', 0.319),
    ('g', 0.57),
    ('h', 0.57),
    ('i', 0.233),
    ('j', 0.233),
    ('k', 0.526),
    ('l', 0.233),
    ('m', 0.87),
    ('n', 0.57),
    ('o', 0.57),
    ('p', 0.57),
    ('q', 0.57),
    ('r', 0.368),
    ('s', 0.435),
    ('t', 0.35),
    ('u', 0.57),
    ('v', 0.5),
    ('w', 0.764),
    ('x', 0.526),
    ('y', 0.5),
    ('z', 0.435),
];

fn char_width(ch: char) -> f64 {
    let lower = ch.to_ascii_lowercase();
    CHAR_WIDTHS
        .iter()
        .find(|(c, _)| *c == lower)
        .map_or(DEFAULT_CHAR_WIDTH, |(_, w)| *w)
}

/// Average relative glyph width of `text`; zero for empty text.
#[must_use]
pub fn average_char_width(text: &str) -> f64 {
    let (sum, count) = text
        .chars()
        .fold((0.0, 0_u32), |(sum, count), ch| (sum + char_width(ch), count + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

/// Heuristic rendered size of `text` at `font_size`: `(width, height)`.
///
/// Not glyph-exact; callers tolerate some visual imprecision.
#[must_use]
pub fn estimate_text_size(text: &str, font_size: f64) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let len = text.chars().count() as f64;
    (len * font_size * average_char_width(text), font_size)
}

/// Whether `a` and `b` overlap once both are inflated by `margin`.
///
/// Symmetric. With a positive margin, rectangles that merely touch count as overlapping.
#[must_use]
pub fn rects_overlap(a: &Rect, b: &Rect, margin: f64) -> bool {
    !(a.x > b.x + b.width + margin
        || a.x + a.width + margin < b.x
        || a.y > b.y + b.height + margin
        || a.y + a.height + margin < b.y)
}
