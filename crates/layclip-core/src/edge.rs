use serde::{Deserialize, Serialize};

use crate::error::{ClipError, InputDefect};
use crate::geometry::{Point, Rational};
use crate::polygon::PolygonSet;

/// Which operand of a boolean call an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolyKind {
    Subject,
    Clip,
}

impl PolyKind {
    pub fn index(self) -> usize {
        match self {
            PolyKind::Subject => 0,
            PolyKind::Clip => 1,
        }
    }
}

/// Stable handle into an edge arena. Splitting never invalidates one.
pub type EdgeId = usize;

/// One straight piece of an input ring, normalized to sweep order.
///
/// `bot` precedes `top` in sweep order (lower y, or lower x on a
/// horizontal). `forward` records whether the source ring runs from `bot`
/// to `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub bot: Point,
    pub top: Point,
    pub kind: PolyKind,
    pub ring: usize,
    pub forward: bool,
}

impl Edge {
    /// Edge for the ring step `from -> to`; `None` for a zero-length step.
    pub fn from_directed(from: Point, to: Point, kind: PolyKind, ring: usize) -> Option<Self> {
        if from == to {
            return None;
        }
        let forward = from.sweep_cmp(&to).is_lt();
        let (bot, top) = if forward { (from, to) } else { (to, from) };
        Some(Self {
            bot,
            top,
            kind,
            ring,
            forward,
        })
    }

    pub fn is_horizontal(&self) -> bool {
        self.bot.y == self.top.y
    }

    /// Endpoints in the source ring's direction.
    pub fn directed(&self) -> (Point, Point) {
        if self.forward {
            (self.bot, self.top)
        } else {
            (self.top, self.bot)
        }
    }

    /// Change in winding count when crossing this edge: left to right for
    /// a sloped edge, bottom to top for a horizontal one. Counter-clockwise
    /// rings are +1 inside.
    pub fn wind(&self) -> i32 {
        match (self.is_horizontal(), self.forward) {
            (true, true) | (false, false) => 1,
            _ => -1,
        }
    }

    /// Winding change split per operand, indexed by [`PolyKind::index`].
    pub fn winds(&self) -> [i32; 2] {
        let mut w = [0; 2];
        w[self.kind.index()] = self.wind();
        w
    }

    pub fn dx(&self) -> i64 {
        self.top.x - self.bot.x
    }

    pub fn dy(&self) -> i64 {
        self.top.y - self.bot.y
    }

    /// Exact x where a sloped edge meets the scan line `y`.
    pub fn x_at(&self, y: i64) -> Rational {
        x_at(self.bot, self.top, y)
    }
}

/// Exact x of the line through `bot` and `top` (non-horizontal) at `y`.
pub fn x_at(bot: Point, top: Point, y: i64) -> Rational {
    if y == bot.y {
        return Rational::from_int(bot.x);
    }
    if y == top.y {
        return Rational::from_int(top.x);
    }
    let dy = (top.y - bot.y) as i128;
    let num = bot.x as i128 * dy + (top.x - bot.x) as i128 * (y - bot.y) as i128;
    Rational::new(num, dy)
}

/// Convert both operands into tagged edges.
///
/// Zero-area rings are degenerate rather than invalid and are skipped.
/// Coordinates are re-checked so that every later product fits in `i128`.
pub fn build_edges(subject: &PolygonSet, clip: &PolygonSet) -> Result<Vec<Edge>, ClipError> {
    let mut edges = Vec::with_capacity(subject.vertex_count() + clip.vertex_count());
    for (set, kind) in [(subject, PolyKind::Subject), (clip, PolyKind::Clip)] {
        for (id, ring) in set.rings().iter().enumerate() {
            if let Some(p) = ring.points().iter().find(|p| !p.in_range()) {
                return Err(ClipError::InvalidInput {
                    ring: id,
                    reason: InputDefect::OutOfRange { x: p.x, y: p.y },
                });
            }
            if ring.is_degenerate() {
                log::debug!("dropping zero-area {:?} ring {}", kind, id);
                continue;
            }
            edges.extend(
                ring.edges()
                    .filter_map(|(from, to)| Edge::from_directed(from, to, kind, id)),
            );
        }
    }
    Ok(edges)
}

/// Sorted distinct y values at which the active edge list changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scanbeams {
    ys: Vec<i64>,
}

impl Scanbeams {
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        Self::from_ys(edges.into_iter().flat_map(|e| [e.bot.y, e.top.y]))
    }

    pub fn from_ys(ys: impl IntoIterator<Item = i64>) -> Self {
        let mut ys: Vec<i64> = ys.into_iter().collect();
        ys.sort_unstable();
        ys.dedup();
        Self { ys }
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.ys.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ys.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}
