use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::ClipError;

/// Largest accepted absolute coordinate value.
///
/// Every predicate in the engine multiplies at most three coordinate
/// differences together in `i128`; with `|c| <= 2^40` the largest
/// intermediate stays below `2^127`.
pub const COORD_LIMIT: i64 = 1 << 40;

/// A 2D point on the integer layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn in_range(&self) -> bool {
        self.x.unsigned_abs() <= COORD_LIMIT as u64 && self.y.unsigned_abs() <= COORD_LIMIT as u64
    }

    /// Round a floating point location onto the grid.
    pub fn from_f64(x: f64, y: f64) -> Result<Self, ClipError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ClipError::NumericOverflow(format!(
                "non-finite coordinate ({x}, {y})"
            )));
        }
        let (rx, ry) = (x.round(), y.round());
        let limit = COORD_LIMIT as f64;
        if rx.abs() > limit || ry.abs() > limit {
            return Err(ClipError::NumericOverflow(format!(
                "coordinate ({rx}, {ry}) exceeds ±{COORD_LIMIT}"
            )));
        }
        Ok(Self::new(rx as i64, ry as i64))
    }

    /// Sweep order: bottom to top, then left to right.
    pub fn sweep_cmp(&self, other: &Point) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

/// Cross product of `a - o` and `b - o`.
pub fn cross(o: Point, a: Point, b: Point) -> i128 {
    let (ax, ay) = ((a.x - o.x) as i128, (a.y - o.y) as i128);
    let (bx, by) = ((b.x - o.x) as i128, (b.y - o.y) as i128);
    ax * by - ay * bx
}

/// Cross product of two direction vectors.
pub fn cross_dir(a: (i64, i64), b: (i64, i64)) -> i128 {
    a.0 as i128 * b.1 as i128 - a.1 as i128 * b.0 as i128
}

pub fn dot_dir(a: (i64, i64), b: (i64, i64)) -> i128 {
    a.0 as i128 * b.0 as i128 + a.1 as i128 * b.1 as i128
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

/// Turn direction of `a -> b -> c`.
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    match cross(a, b, c).cmp(&0) {
        Ordering::Greater => Orientation::CounterClockwise,
        Ordering::Less => Orientation::Clockwise,
        Ordering::Equal => Orientation::Collinear,
    }
}

/// Twice the signed area of a closed ring (shoelace), exact.
pub fn signed_area2(points: &[Point]) -> i128 {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let mut sum = 0i128;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
    }
    sum
}

pub fn signed_area(points: &[Point]) -> f64 {
    signed_area2(points) as f64 / 2.0
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(*first, *first);
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_bbox(&self, other: &BBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow every side by `margin`. `None` when a corner would leave the
    /// coordinate range.
    pub fn expanded(&self, margin: i64) -> Option<Self> {
        let limit = |v: Option<i64>| v.filter(|v| v.unsigned_abs() <= COORD_LIMIT as u64);
        let min = Point::new(
            limit(self.min.x.checked_sub(margin))?,
            limit(self.min.y.checked_sub(margin))?,
        );
        let max = Point::new(
            limit(self.max.x.checked_add(margin))?,
            limit(self.max.y.checked_add(margin))?,
        );
        (min.x <= max.x && min.y <= max.y).then_some(Self { min, max })
    }
}

/// True when `p` lies on the closed segment `a`-`b`.
pub fn on_segment(p: Point, a: Point, b: Point) -> bool {
    cross(a, b, p) == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Integer division rounding half away from zero.
pub fn div_round(num: i128, den: i128) -> i128 {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((-2 * num + den) / (2 * den))
    }
}

/// Meeting point of segments `a0`-`a1` and `b0`-`b1`, rounded to the grid.
///
/// Returns `None` for parallel (including collinear) segments and for
/// segments that do not meet.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let r = (a1.x - a0.x, a1.y - a0.y);
    let s = (b1.x - b0.x, b1.y - b0.y);
    let mut den = cross_dir(r, s);
    if den == 0 {
        return None;
    }
    let qp = (b0.x - a0.x, b0.y - a0.y);
    let mut t = cross_dir(qp, s);
    let mut u = cross_dir(qp, r);
    if den < 0 {
        den = -den;
        t = -t;
        u = -u;
    }
    if t < 0 || t > den || u < 0 || u > den {
        return None;
    }
    let x = a0.x as i128 + div_round(r.0 as i128 * t, den);
    let y = a0.y as i128 + div_round(r.1 as i128 * t, den);
    Some(Point::new(x as i64, y as i64))
}

/// An exact rational, used for an edge's x position at a scan line.
#[derive(Debug, Clone, Copy)]
pub struct Rational {
    num: i128,
    den: i128,
}

impl Rational {
    pub fn new(num: i128, den: i128) -> Self {
        debug_assert!(den != 0);
        if den < 0 {
            Self { num: -num, den: -den }
        } else {
            Self { num, den }
        }
    }

    pub fn from_int(v: i64) -> Self {
        Self { num: v as i128, den: 1 }
    }

    /// `Some` when the value lies exactly on the grid.
    pub fn to_integer(&self) -> Option<i64> {
        (self.num % self.den == 0).then(|| (self.num / self.den) as i64)
    }

    pub fn round(&self) -> i64 {
        div_round(self.num, self.den) as i64
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

/// Where a point sits relative to a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointLocation {
    Inside,
    Outside,
    OnBoundary,
}

/// Winding number of `p` with respect to the closed ring, counter-clockwise
/// positive. Points on the boundary get an arbitrary but finite count; use
/// [`locate_point`] when the boundary matters.
pub fn winding_number(p: Point, ring: &[Point]) -> i32 {
    let n = ring.len();
    let mut wn = 0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && cross(a, b, p) > 0 {
                wn += 1;
            }
        } else if b.y <= p.y && cross(a, b, p) < 0 {
            wn -= 1;
        }
    }
    wn
}

/// Classify `p` against a ring using its winding count (non-zero inside).
pub fn locate_point(p: Point, ring: &[Point]) -> PointLocation {
    let n = ring.len();
    for i in 0..n {
        if on_segment(p, ring[i], ring[(i + 1) % n]) {
            return PointLocation::OnBoundary;
        }
    }
    if winding_number(p, ring) != 0 {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}
