use layclip_core::FillRule;
use serde::{Deserialize, Serialize};

/// The boolean operation applied to subject and clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipOp {
    Union,
    Intersection,
    /// Subject minus clip.
    Difference,
    Xor,
}

impl ClipOp {
    pub fn combine(self, inside_subject: bool, inside_clip: bool) -> bool {
        match self {
            ClipOp::Union => inside_subject || inside_clip,
            ClipOp::Intersection => inside_subject && inside_clip,
            ClipOp::Difference => inside_subject && !inside_clip,
            ClipOp::Xor => inside_subject ^ inside_clip,
        }
    }
}

/// Which side of a boundary segment the result lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left of a sloped segment, below a horizontal one.
    Before,
    /// Right of a sloped segment, above a horizontal one.
    After,
}

/// Decides result membership from per-operand winding counts.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    op: ClipOp,
    fills: [FillRule; 2],
}

impl Evaluator {
    pub fn new(op: ClipOp, subject_fill: FillRule, clip_fill: FillRule) -> Self {
        Self {
            op,
            fills: [subject_fill, clip_fill],
        }
    }

    pub fn op(&self) -> ClipOp {
        self.op
    }

    /// Result membership of a region with winding counts `[subject, clip]`.
    pub fn is_inside(&self, winding: [i32; 2]) -> bool {
        self.op.combine(
            self.fills[0].is_inside(winding[0]),
            self.fills[1].is_inside(winding[1]),
        )
    }

    /// `Some(side)` when a segment separating regions `before` and `after`
    /// belongs to the result boundary.
    pub fn contributes(&self, before: [i32; 2], after: [i32; 2]) -> Option<Side> {
        match (self.is_inside(before), self.is_inside(after)) {
            (false, true) => Some(Side::After),
            (true, false) => Some(Side::Before),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        let cases = [(false, false), (false, true), (true, false), (true, true)];
        let expect = |op: ClipOp| cases.map(|(s, c)| op.combine(s, c));
        assert_eq!(expect(ClipOp::Union), [false, true, true, true]);
        assert_eq!(expect(ClipOp::Intersection), [false, false, false, true]);
        assert_eq!(expect(ClipOp::Difference), [false, false, true, false]);
        assert_eq!(expect(ClipOp::Xor), [false, true, true, false]);
    }

    #[test]
    fn test_contributes_on_status_change_only() {
        let eval = Evaluator::new(ClipOp::Union, FillRule::NonZero, FillRule::NonZero);
        assert_eq!(eval.contributes([0, 0], [1, 0]), Some(Side::After));
        assert_eq!(eval.contributes([1, 1], [0, 1]), None);
        assert_eq!(eval.contributes([0, 1], [0, 0]), Some(Side::Before));

        let eval = Evaluator::new(ClipOp::Intersection, FillRule::EvenOdd, FillRule::NonZero);
        assert_eq!(eval.contributes([1, 1], [2, 1]), Some(Side::Before));
        assert!(!eval.is_inside([2, 5]));
    }
}
