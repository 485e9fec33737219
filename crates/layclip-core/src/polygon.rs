use serde::{Deserialize, Serialize};

use crate::error::{ClipError, InputDefect};
use crate::geometry::{
    locate_point, signed_area, signed_area2, winding_number, BBox, Point, PointLocation,
    COORD_LIMIT,
};

/// Rule deciding which winding counts are "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    /// Inside when the winding count is odd.
    EvenOdd,
    /// Inside when the winding count is non-zero.
    #[default]
    NonZero,
    Positive,
    Negative,
}

impl FillRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::EvenOdd => winding % 2 != 0,
            FillRule::NonZero => winding != 0,
            FillRule::Positive => winding > 0,
            FillRule::Negative => winding < 0,
        }
    }
}

pub fn is_inside(winding_count: i32, fill_rule: FillRule) -> bool {
    fill_rule.is_inside(winding_count)
}

/// A closed boundary loop of at least three distinct vertices.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Counter-clockwise rings (positive area) are outer contours, clockwise
/// rings are holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Validate and normalize a caller-supplied contour.
    ///
    /// Consecutive duplicates and a repeated closing vertex are removed.
    /// Zero-area rings are accepted here; the engine drops them later.
    pub fn new(points: Vec<Point>) -> Result<Self, InputDefect> {
        if let Some(p) = points.iter().find(|p| !p.in_range()) {
            return Err(InputDefect::OutOfRange { x: p.x, y: p.y });
        }
        let mut points = points;
        points.dedup();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        let mut distinct = points.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(InputDefect::TooFewVertices(distinct.len()));
        }
        Ok(Self { points })
    }

    /// Build a ring from floating point coordinates multiplied by `scaling`
    /// and rounded to the grid.
    pub fn from_scaled(coords: &[[f64; 2]], scaling: f64) -> Result<Self, InputDefect> {
        let limit = COORD_LIMIT as f64;
        let mut points = Vec::with_capacity(coords.len());
        for &[x, y] in coords {
            let (sx, sy) = ((x * scaling).round(), (y * scaling).round());
            if !sx.is_finite() || !sy.is_finite() {
                return Err(InputDefect::NonFinite);
            }
            if sx.abs() > limit || sy.abs() > limit {
                return Err(InputDefect::OutOfRange {
                    x: sx.clamp(i64::MIN as f64, i64::MAX as f64) as i64,
                    y: sy.clamp(i64::MIN as f64, i64::MAX as f64) as i64,
                });
            }
            points.push(Point::new(sx as i64, sy as i64));
        }
        Self::new(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Twice the signed area, exact.
    pub fn area2(&self) -> i128 {
        signed_area2(&self.points)
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }

    pub fn is_outer(&self) -> bool {
        self.area2() > 0
    }

    pub fn is_hole(&self) -> bool {
        self.area2() < 0
    }

    pub fn is_degenerate(&self) -> bool {
        self.area2() == 0
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    pub fn bbox(&self) -> BBox {
        // A valid ring always has vertices.
        BBox::from_points(&self.points).unwrap_or(BBox::new(Point::new(0, 0), Point::new(0, 0)))
    }

    pub fn locate(&self, p: Point) -> PointLocation {
        locate_point(p, &self.points)
    }

    pub fn winding_number(&self, p: Point) -> i32 {
        winding_number(p, &self.points)
    }

    /// Consecutive vertex pairs including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl TryFrom<Vec<Point>> for Ring {
    type Error = InputDefect;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Ring::new(points)
    }
}

impl From<Ring> for Vec<Point> {
    fn from(ring: Ring) -> Self {
        ring.points
    }
}

/// A collection of rings forming one operand or one result.
///
/// A ring's id is its index in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonSet {
    rings: Vec<Ring>,
}

impl PolygonSet {
    pub fn new() -> Self {
        Self { rings: Vec::new() }
    }

    pub fn from_rings(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Validate raw paths, reporting the id of the first invalid one.
    pub fn from_paths(paths: Vec<Vec<Point>>) -> Result<Self, ClipError> {
        let rings = paths
            .into_iter()
            .enumerate()
            .map(|(ring, path)| {
                Ring::new(path).map_err(|reason| ClipError::InvalidInput { ring, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rings })
    }

    pub fn from_scaled(paths: &[Vec<[f64; 2]>], scaling: f64) -> Result<Self, ClipError> {
        if !scaling.is_finite() || scaling <= 0.0 {
            return Err(ClipError::InvalidParameter(format!(
                "scaling must be finite and positive, got {scaling}"
            )));
        }
        let rings = paths
            .iter()
            .enumerate()
            .map(|(ring, path)| {
                Ring::from_scaled(path, scaling)
                    .map_err(|reason| ClipError::InvalidInput { ring, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rings })
    }

    pub fn push(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    pub fn extend(&mut self, other: PolygonSet) {
        self.rings.extend(other.rings);
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn into_rings(self) -> Vec<Ring> {
        self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.rings
            .iter()
            .map(Ring::bbox)
            .reduce(|acc, bb| acc.union(&bb))
    }

    /// Sum of signed ring areas, doubled. For a normalized result this is
    /// twice the covered area.
    pub fn area2(&self) -> i128 {
        self.rings.iter().map(Ring::area2).sum()
    }

    pub fn area(&self) -> f64 {
        self.area2() as f64 / 2.0
    }

    /// Total winding count of all rings around `p`.
    pub fn winding_number(&self, p: Point) -> i32 {
        self.rings.iter().map(|r| r.winding_number(p)).sum()
    }

    /// Point inclusion under `fill`; points on any ring boundary count as inside.
    pub fn contains_point(&self, p: Point, fill: FillRule) -> bool {
        if self
            .rings
            .iter()
            .any(|r| r.locate(p) == PointLocation::OnBoundary)
        {
            return true;
        }
        fill.is_inside(self.winding_number(p))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_fill_rules() {
        assert!(is_inside(1, FillRule::EvenOdd));
        assert!(!is_inside(2, FillRule::EvenOdd));
        assert!(is_inside(-1, FillRule::EvenOdd));
        assert!(is_inside(2, FillRule::NonZero));
        assert!(!is_inside(0, FillRule::NonZero));
        assert!(is_inside(-2, FillRule::NonZero));
        assert!(!is_inside(-1, FillRule::Positive));
        assert!(is_inside(-1, FillRule::Negative));
    }

    #[test]
    fn test_ring_strips_closing_duplicate() {
        let ring = Ring::new(pts(&[(0, 0), (10, 0), (10, 0), (10, 10), (0, 0)])).unwrap();
        assert_eq!(ring.len(), 3);
        assert!(ring.is_outer());
        assert_eq!(ring.area2(), 100);
    }

    #[test]
    fn test_ring_rejects_too_few_vertices() {
        let err = Ring::new(pts(&[(0, 0), (10, 0), (0, 0), (10, 0)])).unwrap_err();
        assert_eq!(err, InputDefect::TooFewVertices(2));
    }

    #[test]
    fn test_ring_accepts_degenerate_area() {
        let ring = Ring::new(pts(&[(0, 0), (5, 0), (10, 0)])).unwrap();
        assert!(ring.is_degenerate());
    }

    #[test]
    fn test_ring_rejects_out_of_range() {
        let err = Ring::new(pts(&[(0, 0), (COORD_LIMIT + 1, 0), (0, 5)])).unwrap_err();
        assert!(matches!(err, InputDefect::OutOfRange { .. }));

        let err = Ring::new(pts(&[(0, 0), (i64::MIN, 0), (0, 5)])).unwrap_err();
        assert_eq!(err, InputDefect::OutOfRange { x: i64::MIN, y: 0 });
        let err = Ring::new(pts(&[(0, i64::MIN), (4, 0), (0, 5)])).unwrap_err();
        assert_eq!(err, InputDefect::OutOfRange { x: 0, y: i64::MIN });
    }

    #[test]
    fn test_from_paths_reports_ring_id() {
        let err = PolygonSet::from_paths(vec![
            pts(&[(0, 0), (10, 0), (10, 10)]),
            pts(&[(0, 0), (1, 1)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ClipError::InvalidInput {
                ring: 1,
                reason: InputDefect::TooFewVertices(2)
            }
        );
    }

    #[test]
    fn test_from_scaled_rejects_non_finite() {
        let err = PolygonSet::from_scaled(&[vec![[0.0, 0.0], [1.0, f64::NAN], [1.0, 1.0]]], 1000.0)
            .unwrap_err();
        assert_eq!(
            err,
            ClipError::InvalidInput {
                ring: 0,
                reason: InputDefect::NonFinite
            }
        );

        let set = PolygonSet::from_scaled(&[vec![[0.0, 0.0], [1.0, 0.0], [1.0, 0.5]]], 1000.0)
            .unwrap();
        assert_eq!(set.rings()[0].points()[2], Point::new(1000, 500));
    }

    #[test]
    fn test_contains_point_with_hole() {
        let set = PolygonSet::from_paths(vec![
            pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]),
            pts(&[(3, 3), (3, 7), (7, 7), (7, 3)]),
        ])
        .unwrap();
        assert!(set.contains_point(Point::new(1, 1), FillRule::NonZero));
        assert!(!set.contains_point(Point::new(5, 5), FillRule::NonZero));
        assert!(set.contains_point(Point::new(3, 5), FillRule::NonZero));
        assert_eq!(set.area2(), 200 - 32);
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let set = PolygonSet::from_paths(vec![pts(&[(0, 0), (10, 0), (10, 10)])]).unwrap();
        let json = set.to_json().unwrap();
        assert_eq!(PolygonSet::from_json(&json).unwrap(), set);

        let bad = r#"{"rings":[[{"x":0,"y":0},{"x":1,"y":1}]]}"#;
        assert!(PolygonSet::from_json(bad).is_err());
    }
}
