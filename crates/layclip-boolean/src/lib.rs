//! # layclip Boolean
//!
//! Boolean operations on integer polygon sets: union, intersection,
//! difference and xor under independent fill rules for the two operands.
//!
//! A call runs in three stages. The sweep nodes all edges so they meet only
//! at shared endpoints, a second sweep classifies each distinct segment by
//! the winding counts on its two sides, and the kept segments are threaded
//! into simple rings which the containment tree then nests.

pub mod evaluator;
pub mod ops;
pub mod options;
mod output;
mod sweep;

pub use evaluator::{ClipOp, Evaluator, Side};
pub use ops::{crop, inside, inverse_polarity, merge, slice, Axis, CropSide, ShortCircuit};
pub use options::ClipOptions;

use layclip_core::{build_edges, ClipError, ClipResult, PolyTree, PolygonSet};

use crate::sweep::SweepContext;

/// Apply `op` to `subject` and `clip`.
///
/// Every ring in the result is simple, rings meet at most at isolated
/// vertices, outer contours run counter-clockwise and holes clockwise.
/// Fails with [`ClipError::NodingIncomplete`] when the edges cannot be made
/// planar within `options.max_noding_passes`.
pub fn boolean(
    subject: &PolygonSet,
    clip: &PolygonSet,
    op: ClipOp,
    options: &ClipOptions,
) -> ClipResult<PolyTree> {
    options.validate()?;
    let edges = build_edges(subject, clip)?;
    let input_edges = edges.len();

    let mut sweep = SweepContext::new(edges);
    let passes = sweep
        .node(options.max_noding_passes)
        .ok_or(ClipError::NodingIncomplete(options.max_noding_passes))?;
    let bounds = output::merge_edges(sweep.edges());

    let eval = Evaluator::new(op, options.subject_fill, options.clip_fill);
    let rings = output::build_rings(output::classify(&bounds, &eval));
    log::debug!(
        "{:?}: {} input edges, {} noding passes, {} segments, {} rings",
        op,
        input_edges,
        passes,
        bounds.len(),
        rings.len()
    );
    Ok(PolyTree::from_rings(rings))
}

pub fn union(subject: &PolygonSet, clip: &PolygonSet, options: &ClipOptions) -> ClipResult<PolyTree> {
    boolean(subject, clip, ClipOp::Union, options)
}

pub fn intersection(
    subject: &PolygonSet,
    clip: &PolygonSet,
    options: &ClipOptions,
) -> ClipResult<PolyTree> {
    boolean(subject, clip, ClipOp::Intersection, options)
}

/// `subject` minus `clip`.
pub fn difference(
    subject: &PolygonSet,
    clip: &PolygonSet,
    options: &ClipOptions,
) -> ClipResult<PolyTree> {
    boolean(subject, clip, ClipOp::Difference, options)
}

pub fn xor(subject: &PolygonSet, clip: &PolygonSet, options: &ClipOptions) -> ClipResult<PolyTree> {
    boolean(subject, clip, ClipOp::Xor, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layclip_core::{FillRule, Point, Ring};

    fn ring(coords: &[(i64, i64)]) -> Ring {
        Ring::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    fn set(rings: Vec<Ring>) -> PolygonSet {
        PolygonSet::from_rings(rings)
    }

    #[test]
    fn test_overlapping_squares() {
        let a = set(vec![ring(&[(0, 0), (4, 0), (4, 4), (0, 4)])]);
        let b = set(vec![ring(&[(2, 2), (6, 2), (6, 6), (2, 6)])]);
        let opts = ClipOptions::default();

        let u = union(&a, &b, &opts).unwrap();
        assert_eq!(u.len(), 1);
        assert_eq!(u.area2(), 2 * 28);
        assert_eq!(u.nodes()[0].ring.len(), 8);

        let i = intersection(&a, &b, &opts).unwrap();
        assert_eq!(i.len(), 1);
        assert_eq!(i.area2(), 2 * 4);
        assert_eq!(
            i.nodes()[0].ring.points(),
            &[Point::new(2, 2), Point::new(4, 2), Point::new(4, 4), Point::new(2, 4)]
        );

        let d = difference(&a, &b, &opts).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d.area2(), 2 * 12);
        assert_eq!(d.nodes()[0].ring.len(), 6);

        let x = xor(&a, &b, &opts).unwrap();
        assert_eq!(x.area2(), 2 * 24);
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn test_noding_pass_limit() {
        let a = set(vec![ring(&[(0, 0), (4, 0), (4, 4), (0, 4)])]);
        let b = set(vec![ring(&[(2, 2), (6, 2), (6, 6), (2, 6)])]);
        let limited = |max_noding_passes| ClipOptions {
            max_noding_passes,
            ..ClipOptions::default()
        };

        let err = union(&a, &b, &limited(0)).unwrap_err();
        assert!(matches!(err, ClipError::InvalidParameter(_)));

        // The first pass splits the crossing edges; only a second pass can
        // confirm nothing is left to split.
        let err = union(&a, &b, &limited(1)).unwrap_err();
        assert_eq!(err, ClipError::NodingIncomplete(1));

        assert_eq!(union(&a, &b, &limited(2)).unwrap().area2(), 2 * 28);

        // Disjoint squares are settled by the first pass.
        let c = set(vec![ring(&[(10, 0), (14, 0), (14, 4), (10, 4)])]);
        assert_eq!(union(&a, &c, &limited(1)).unwrap().area2(), 2 * 32);
    }

    #[test]
    fn test_long_staircase_union() {
        // Each square overlaps the previous one in a 2 x 2 corner.
        let n = 40;
        let steps: Vec<Ring> = (0..n)
            .map(|i| {
                let o = 2 * i;
                ring(&[(o, o), (o + 4, o), (o + 4, o + 4), (o, o + 4)])
            })
            .collect();
        let (evens, odds): (Vec<_>, Vec<_>) =
            steps.into_iter().enumerate().partition(|(i, _)| i % 2 == 0);
        let a = set(evens.into_iter().map(|(_, r)| r).collect());
        let b = set(odds.into_iter().map(|(_, r)| r).collect());

        let u = union(&a, &b, &ClipOptions::default()).unwrap();
        assert_eq!(u.len(), 1);
        assert_eq!(u.area2(), 2 * (16 + (n as i128 - 1) * 12));

        let i = intersection(&a, &b, &ClipOptions::default()).unwrap();
        assert_eq!(i.len(), n as usize - 1);
        assert_eq!(i.area2(), 2 * (n as i128 - 1) * 4);
    }

    #[test]
    fn test_crossing_triangles_need_exact_split() {
        // The diagonals cross at (5, 5).
        let a = set(vec![ring(&[(0, 0), (10, 10), (0, 10)])]);
        let b = set(vec![ring(&[(10, 0), (10, 10), (0, 10)])]);
        let i = intersection(&a, &b, &ClipOptions::default()).unwrap();
        assert_eq!(i.len(), 1);
        assert_eq!(i.area2(), 50);
    }

    #[test]
    fn test_difference_leaves_hole() {
        let a = set(vec![ring(&[(0, 0), (10, 0), (10, 10), (0, 10)])]);
        let b = set(vec![ring(&[(3, 3), (7, 3), (7, 7), (3, 7)])]);
        let d = difference(&a, &b, &ClipOptions::default()).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d.outer_count(), 1);
        assert_eq!(d.hole_count(), 1);
        let hole = d.nodes().iter().position(|n| n.is_hole()).unwrap();
        assert!(d.parent(hole).is_some());
        assert_eq!(d.area2(), 2 * (100 - 16));
    }

    #[test]
    fn test_fill_rules_on_self_overlap() {
        // Two overlapping squares in one operand, both counter-clockwise.
        let a = set(vec![
            ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]),
            ring(&[(2, 0), (6, 0), (6, 4), (2, 4)]),
        ]);
        let empty = PolygonSet::new();
        let nonzero = union(&a, &empty, &ClipOptions::default()).unwrap();
        assert_eq!(nonzero.area2(), 2 * 24);
        assert_eq!(nonzero.len(), 1);

        let evenodd = union(&a, &empty, &ClipOptions::with_fill(FillRule::EvenOdd)).unwrap();
        assert_eq!(evenodd.area2(), 2 * 16);
        assert_eq!(evenodd.len(), 2);
    }

    #[test]
    fn test_empty_operands() {
        let a = set(vec![ring(&[(0, 0), (4, 0), (4, 4), (0, 4)])]);
        let empty = PolygonSet::new();
        let opts = ClipOptions::default();
        assert!(intersection(&a, &empty, &opts).unwrap().is_empty());
        assert_eq!(union(&a, &empty, &opts).unwrap().area2(), 32);
        assert_eq!(difference(&a, &empty, &opts).unwrap().area2(), 32);
        assert!(difference(&empty, &a, &opts).unwrap().is_empty());
        assert!(union(&empty, &empty, &opts).unwrap().is_empty());
    }
}
