use layclip_core::{
    BBox, ClipError, ClipResult, FillRule, Point, PolyTree, PolygonSet, Ring, COORD_LIMIT,
};
use serde::{Deserialize, Serialize};

use crate::evaluator::ClipOp;
use crate::options::ClipOptions;
use crate::boolean;

/// Axis along which [`slice`] cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Cut lines are vertical, `x = position`.
    X,
    /// Cut lines are horizontal, `y = position`.
    Y,
}

/// Side of the bounding box that [`crop`] cuts away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// How [`inside`] reduces the points of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShortCircuit {
    /// True when any point of the group is inside.
    #[default]
    Any,
    /// True when every point of the group is inside.
    All,
}

/// Cut `set` along `axis` at `positions`, returning the pieces between
/// consecutive cuts in ascending order. There is always one more band than
/// there are positions; bands that hold nothing are empty trees.
pub fn slice(
    set: &PolygonSet,
    positions: &[i64],
    axis: Axis,
    options: &ClipOptions,
) -> ClipResult<Vec<PolyTree>> {
    if let Some(p) = positions.iter().find(|p| p.unsigned_abs() > COORD_LIMIT as u64) {
        return Err(ClipError::InvalidParameter(format!(
            "slice position {p} exceeds ±{COORD_LIMIT}"
        )));
    }
    let mut cuts = positions.to_vec();
    cuts.sort_unstable();

    let Some(bbox) = set.bbox() else {
        return Ok(vec![PolyTree::default(); cuts.len() + 1]);
    };
    let (lo, hi, cross_lo, cross_hi) = match axis {
        Axis::X => (bbox.min.x, bbox.max.x, bbox.min.y, bbox.max.y),
        Axis::Y => (bbox.min.y, bbox.max.y, bbox.min.x, bbox.max.x),
    };

    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(lo);
    bounds.extend(cuts.iter().map(|&c| c.clamp(lo, hi)));
    bounds.push(hi);

    let mut bands = Vec::with_capacity(cuts.len() + 1);
    for pair in bounds.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a >= b || cross_lo >= cross_hi {
            bands.push(PolyTree::default());
            continue;
        }
        let band = match axis {
            Axis::X => BBox::new(Point::new(a, cross_lo), Point::new(b, cross_hi)),
            Axis::Y => BBox::new(Point::new(cross_lo, a), Point::new(cross_hi, b)),
        };
        bands.push(boolean(set, &rectangle(&band)?, ClipOp::Intersection, options)?);
    }
    log::debug!("sliced along {:?} into {} bands", axis, bands.len());
    Ok(bands)
}

/// Remove a strip `amount` wide from one side of the bounding box of `set`.
/// Cropping the whole extent or more leaves an empty tree.
pub fn crop(
    set: &PolygonSet,
    side: CropSide,
    amount: i64,
    options: &ClipOptions,
) -> ClipResult<PolyTree> {
    if amount < 0 {
        return Err(ClipError::InvalidParameter(format!(
            "crop amount must not be negative, got {amount}"
        )));
    }
    let Some(mut window) = set.bbox() else {
        log::debug!("nothing to crop in an empty set");
        return Ok(PolyTree::default());
    };
    let extent = match side {
        CropSide::Top | CropSide::Bottom => window.height(),
        CropSide::Right | CropSide::Left => window.width(),
    };
    if amount >= extent || window.width() == 0 || window.height() == 0 {
        return Ok(PolyTree::default());
    }
    match side {
        CropSide::Top => window.max.y -= amount,
        CropSide::Right => window.max.x -= amount,
        CropSide::Bottom => window.min.y += amount,
        CropSide::Left => window.min.x += amount,
    }
    boolean(set, &rectangle(&window)?, ClipOp::Intersection, options)
}

/// The area around `set` inside its bounding box grown by `margin`: the
/// xor of `set` with that box.
pub fn inverse_polarity(
    set: &PolygonSet,
    margin: i64,
    options: &ClipOptions,
) -> ClipResult<PolyTree> {
    if margin < 0 {
        return Err(ClipError::InvalidParameter(format!(
            "polarity margin must not be negative, got {margin}"
        )));
    }
    let Some(bbox) = set.bbox() else {
        return Ok(PolyTree::default());
    };
    let frame = bbox.expanded(margin).ok_or_else(|| {
        ClipError::NumericOverflow(format!(
            "bounding box {bbox:?} grown by {margin} exceeds ±{COORD_LIMIT}"
        ))
    })?;
    if frame.width() == 0 || frame.height() == 0 {
        return boolean(set, &PolygonSet::new(), ClipOp::Union, options);
    }
    boolean(set, &rectangle(&frame)?, ClipOp::Xor, options)
}

/// Unite the rings of one set into non-overlapping rings under the subject
/// fill rule.
pub fn merge(set: &PolygonSet, options: &ClipOptions) -> ClipResult<PolyTree> {
    boolean(set, &PolygonSet::new(), ClipOp::Union, options)
}

fn rectangle(bbox: &BBox) -> ClipResult<PolygonSet> {
    let (lo, hi) = (bbox.min, bbox.max);
    let ring = Ring::new(vec![lo, Point::new(hi.x, lo.y), hi, Point::new(lo.x, hi.y)])
        .map_err(|reason| ClipError::InvalidInput { ring: 0, reason })?;
    Ok(PolygonSet::from_rings(vec![ring]))
}

/// Test each group of points against `set`. Points on a boundary count as
/// inside. An empty group is inside under `All` and outside under `Any`.
pub fn inside(
    groups: &[Vec<Point>],
    set: &PolygonSet,
    short_circuit: ShortCircuit,
    fill: FillRule,
) -> Vec<bool> {
    groups
        .iter()
        .map(|group| {
            let mut hits = group.iter().map(|&p| set.contains_point(p, fill));
            match short_circuit {
                ShortCircuit::Any => hits.any(|hit| hit),
                ShortCircuit::All => hits.all(|hit| hit),
            }
        })
        .collect()
}
