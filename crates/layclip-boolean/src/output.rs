//! Classification of noded edges and threading of the result rings.

use std::collections::BTreeMap;

use layclip_core::edge::{x_at, Edge, Scanbeams};
use layclip_core::geometry::{cross, cross_dir, dot_dir, Point, Rational};
use layclip_core::Ring;

use crate::evaluator::{Evaluator, Side};
use crate::sweep::insertion_sort_by;

/// A distinct segment of the planar arrangement with the summed winding
/// change of every input edge lying on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Boundary {
    pub bot: Point,
    pub top: Point,
    pub wind: [i32; 2],
}

impl Boundary {
    fn is_horizontal(&self) -> bool {
        self.bot.y == self.top.y
    }
}

/// A result boundary segment directed so the result lies on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputEdge {
    pub from: Point,
    pub to: Point,
}

/// Merge coincident edges. Segments whose windings cancel in both operands
/// cannot separate different regions and are dropped.
pub(crate) fn merge_edges(edges: &[Edge]) -> Vec<Boundary> {
    let mut merged: BTreeMap<(Point, Point), [i32; 2]> = BTreeMap::new();
    for e in edges {
        let wind = merged.entry((e.bot, e.top)).or_insert([0, 0]);
        let w = e.winds();
        wind[0] += w[0];
        wind[1] += w[1];
    }
    merged
        .into_iter()
        .filter(|(_, wind)| *wind != [0, 0])
        .map(|((bot, top), wind)| Boundary { bot, top, wind })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct BeamEdge {
    id: usize,
    lo_x: Rational,
    hi_x: Rational,
}

/// The sloped segments crossing one scanbeam in x order, with running
/// winding totals: `prefix[k]` is the winding left of entry `k`.
struct Beam {
    entries: Vec<BeamEdge>,
    prefix: Vec<[i32; 2]>,
}

impl Beam {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            prefix: vec![[0, 0]],
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.prefix.clear();
        self.prefix.push([0, 0]);
    }

    /// Refill from `active`, which is expected in roughly the right order.
    fn fill(&mut self, bounds: &[Boundary], active: &[usize], y: i64, next_y: i64) {
        self.entries.clear();
        self.entries.extend(active.iter().map(|&id| BeamEdge {
            id,
            lo_x: x_at(bounds[id].bot, bounds[id].top, y),
            hi_x: x_at(bounds[id].bot, bounds[id].top, next_y),
        }));
        insertion_sort_by(&mut self.entries, |a, b| {
            a.lo_x
                .cmp(&b.lo_x)
                .then(a.hi_x.cmp(&b.hi_x))
                .then(a.id.cmp(&b.id))
        });
        self.prefix.clear();
        let mut acc = [0, 0];
        self.prefix.push(acc);
        for e in &self.entries {
            acc[0] += bounds[e.id].wind[0];
            acc[1] += bounds[e.id].wind[1];
            self.prefix.push(acc);
        }
    }

    /// Winding just above the bottom scan line at x = `mid`.
    fn winding_above(&self, mid: Rational) -> [i32; 2] {
        let k = self
            .entries
            .partition_point(|e| e.lo_x < mid || (e.lo_x == mid && e.hi_x < mid));
        self.prefix[k]
    }

    /// Winding just below the top scan line at x = `mid`.
    fn winding_below(&self, mid: Rational) -> [i32; 2] {
        let k = self
            .entries
            .partition_point(|e| e.hi_x < mid || (e.hi_x == mid && e.lo_x < mid));
        self.prefix[k]
    }
}

/// Sweep the arrangement and keep every segment where result membership
/// changes.
pub(crate) fn classify(bounds: &[Boundary], eval: &Evaluator) -> Vec<OutputEdge> {
    let scanbeams = Scanbeams::from_ys(bounds.iter().flat_map(|b| [b.bot.y, b.top.y]));

    let mut minima: Vec<usize> = (0..bounds.len())
        .filter(|&i| !bounds[i].is_horizontal())
        .collect();
    minima.sort_by(|&a, &b| bounds[a].bot.sweep_cmp(&bounds[b].bot).then(a.cmp(&b)));
    let mut horizontals: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, b) in bounds.iter().enumerate() {
        if b.is_horizontal() {
            horizontals.entry(b.bot.y).or_default().push(i);
        }
    }

    let mut classified = vec![false; bounds.len()];
    let mut out = Vec::new();
    // Segments crossing the current beam, kept in the previous beam's x
    // order. Noded segments never cross, so that order stays valid.
    let mut active: Vec<usize> = Vec::new();
    let mut next_minimum = 0;
    let mut below = Beam::empty();
    let mut above = Beam::empty();

    for (i, y) in scanbeams.iter().enumerate() {
        active.retain(|&id| bounds[id].top.y > y);
        while let Some(&id) = minima.get(next_minimum) {
            if bounds[id].bot.y != y {
                break;
            }
            let x = Rational::from_int(bounds[id].bot.x);
            let at = active.partition_point(|&a| x_at(bounds[a].bot, bounds[a].top, y) <= x);
            active.insert(at, id);
            next_minimum += 1;
        }

        match scanbeams.get(i + 1) {
            Some(next_y) => above.fill(bounds, &active, y, next_y),
            None => above.clear(),
        }
        active.clear();
        active.extend(above.entries.iter().map(|e| e.id));

        for (k, entry) in above.entries.iter().enumerate() {
            if std::mem::replace(&mut classified[entry.id], true) {
                continue;
            }
            let b = bounds[entry.id];
            match eval.contributes(above.prefix[k], above.prefix[k + 1]) {
                // Result on the right: walk downward to keep it on the left.
                Some(Side::After) => out.push(OutputEdge {
                    from: b.top,
                    to: b.bot,
                }),
                Some(Side::Before) => out.push(OutputEdge {
                    from: b.bot,
                    to: b.top,
                }),
                None => {}
            }
        }

        for &h in horizontals.get(&y).map(Vec::as_slice).unwrap_or(&[]) {
            let b = bounds[h];
            let mid = Rational::new((b.bot.x + b.top.x) as i128, 2);
            match eval.contributes(below.winding_below(mid), above.winding_above(mid)) {
                // Result above: walk rightward.
                Some(Side::After) => out.push(OutputEdge {
                    from: b.bot,
                    to: b.top,
                }),
                Some(Side::Before) => out.push(OutputEdge {
                    from: b.top,
                    to: b.bot,
                }),
                None => {}
            }
        }

        std::mem::swap(&mut below, &mut above);
    }
    out
}

/// Rank of `d` by clockwise angle from `r`, for outgoing edge selection.
fn clockwise_from(r: (i64, i64), d: (i64, i64)) -> u8 {
    let c = cross_dir(r, d);
    if c < 0 {
        0
    } else if c == 0 && dot_dir(r, d) < 0 {
        1
    } else {
        2
    }
}

/// Thread directed output edges into closed rings.
///
/// At a vertex the walk takes the outgoing edge reached first turning
/// clockwise from the reversed incoming edge, which pairs the two edges
/// bounding one inside sector. Rings therefore never cross themselves or
/// each other; they may touch at vertices.
pub(crate) fn build_rings(mut edges: Vec<OutputEdge>) -> Vec<Ring> {
    edges.sort_by(|a, b| a.from.sweep_cmp(&b.from).then(a.to.sweep_cmp(&b.to)));

    let mut outgoing: BTreeMap<Point, Vec<usize>> = BTreeMap::new();
    for (i, e) in edges.iter().enumerate() {
        outgoing.entry(e.from).or_default().push(i);
    }

    let next_edge = |cur: usize| -> Option<usize> {
        let e = edges[cur];
        let r = (e.from.x - e.to.x, e.from.y - e.to.y);
        let candidates = outgoing.get(&e.to)?;
        candidates.iter().copied().min_by(|&a, &b| {
            let da = (edges[a].to.x - e.to.x, edges[a].to.y - e.to.y);
            let db = (edges[b].to.x - e.to.x, edges[b].to.y - e.to.y);
            clockwise_from(r, da)
                .cmp(&clockwise_from(r, db))
                .then_with(|| cross_dir(da, db).cmp(&0))
        })
    };

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut points = Vec::new();
        let mut cur = start;
        let closed = loop {
            used[cur] = true;
            points.push(edges[cur].from);
            match next_edge(cur) {
                Some(next) if next == start => break true,
                Some(next) if !used[next] => cur = next,
                _ => break false,
            }
        };
        if !closed {
            log::warn!("dropping open output chain ending at {:?}", edges[cur].to);
            continue;
        }
        if let Some(ring) = clean_ring(points) {
            rings.push(ring);
        }
    }
    rings.sort_by(|a, b| {
        a.points()[0]
            .sweep_cmp(&b.points()[0])
            .then_with(|| a.area2().cmp(&b.area2()))
    });
    log::debug!("threaded {} output edges into {} rings", edges.len(), rings.len());
    rings
}

/// Drop duplicate and collinear vertices, rotate to the lowest-leftmost
/// vertex, and discard what no longer encloses area.
fn clean_ring(mut points: Vec<Point>) -> Option<Ring> {
    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;
        let mut i = 0;
        while points.len() >= 3 && i < points.len() {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            if points[i] == next || cross(prev, points[i], next) == 0 {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
    if points.len() < 3 {
        return None;
    }
    let lowest = points
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.sweep_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    points.rotate_left(lowest);
    Ring::new(points).ok().filter(|ring| !ring.is_degenerate())
}
