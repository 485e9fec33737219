//! Scanbeam sweep that nodes the input edges.
//!
//! Every pass walks the scanbeams bottom to top, keeping the active edge
//! list (AEL) in x order, and records a split wherever two edges cross,
//! where a vertex lies on another edge, and where a horizontal edge is hit.
//! Split points are rounded to the grid, which can bend an edge into a new
//! crossing, so passes repeat until one finds nothing to split. Afterwards
//! edges meet only at shared endpoints or coincide exactly.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use layclip_core::edge::{Edge, EdgeId, Scanbeams};
use layclip_core::geometry::{cross_dir, dot_dir, segment_intersection, Point, Rational};

/// An edge on the sweep line together with its current x.
#[derive(Debug, Clone, Copy)]
struct ActiveEdge {
    id: EdgeId,
    curr_x: Rational,
    next_x: Rational,
}

/// A pending split of `edge` at `(x, y)`. Ordered by y, then x, then edge
/// id, which is also the order splits are reported in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SplitEvent {
    y: i64,
    x: i64,
    edge: EdgeId,
}

/// Call-scoped sweep state. Nothing here outlives one boolean call.
pub(crate) struct SweepContext {
    edges: Vec<Edge>,
    active: Vec<ActiveEdge>,
    /// Sloped edges ordered by bottom vertex.
    minima: Vec<EdgeId>,
    next_minimum: usize,
    horizontals: BTreeMap<i64, Vec<EdgeId>>,
    /// Distinct endpoint x values per scan line.
    vertices: BTreeMap<i64, Vec<i64>>,
    events: Vec<SplitEvent>,
    /// Edge pairs swapped inside the current beam.
    crossings: Vec<(EdgeId, EdgeId)>,
}

impl SweepContext {
    pub(crate) fn new(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            active: Vec::new(),
            minima: Vec::new(),
            next_minimum: 0,
            horizontals: BTreeMap::new(),
            vertices: BTreeMap::new(),
            events: Vec::new(),
            crossings: Vec::new(),
        }
    }

    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Run passes until one finds nothing to split. Returns the number of
    /// passes run, or `None` when `max_passes` ran out first.
    pub(crate) fn node(&mut self, max_passes: usize) -> Option<usize> {
        for pass in 1..=max_passes {
            let split = self.run_pass();
            log::debug!(
                "noding pass {}: {} edges split, {} edges total",
                pass,
                split,
                self.edges.len()
            );
            if split == 0 {
                return Some(pass);
            }
        }
        log::warn!(
            "noding stopped after {} passes with splits still pending",
            max_passes
        );
        None
    }

    fn reset(&mut self) {
        self.active.clear();
        self.events.clear();
        self.horizontals.clear();
        self.vertices.clear();
        self.next_minimum = 0;

        let edges = &self.edges;
        self.minima = (0..edges.len())
            .filter(|&id| !edges[id].is_horizontal())
            .collect();
        self.minima
            .sort_by(|&a, &b| edges[a].bot.sweep_cmp(&edges[b].bot).then(a.cmp(&b)));

        for (id, e) in edges.iter().enumerate() {
            if e.is_horizontal() {
                self.horizontals.entry(e.bot.y).or_default().push(id);
            }
            self.vertices.entry(e.bot.y).or_default().push(e.bot.x);
            self.vertices.entry(e.top.y).or_default().push(e.top.x);
        }
        for xs in self.vertices.values_mut() {
            xs.sort_unstable();
            xs.dedup();
        }
    }

    fn run_pass(&mut self) -> usize {
        self.reset();
        let scanbeams = Scanbeams::from_edges(&self.edges);
        for (i, y) in scanbeams.iter().enumerate() {
            self.update_active_edges(y);
            self.process_scanline(y);
            self.insert_local_minima(y);
            if let Some(next_y) = scanbeams.get(i + 1) {
                self.process_intersections(y, next_y);
            }
        }
        self.apply_splits()
    }

    /// Drop edges whose top is reached and move the rest onto `y`. The
    /// previous beam left the AEL ordered at `y` already.
    fn update_active_edges(&mut self, y: i64) {
        let edges = &self.edges;
        self.active.retain(|a| edges[a.id].top.y > y);
        for a in &mut self.active {
            a.curr_x = edges[a.id].x_at(y);
        }
        insertion_sort_by(&mut self.active, |a, b| {
            a.curr_x.cmp(&b.curr_x).then(a.id.cmp(&b.id))
        });
    }

    /// Events on the scan line itself, seen by edges that pass through it.
    fn process_scanline(&mut self, y: i64) {
        // Each scan line is visited once per pass; `reset` rebuilds both maps.
        let vertices = self.vertices.remove(&y).unwrap_or_default();
        let horizontals = self.horizontals.remove(&y).unwrap_or_default();
        let edges = &self.edges;
        let passing = &self.active;
        let events = &mut self.events;

        // A vertex on a passing edge.
        for a in passing {
            if let Some(x) = a.curr_x.to_integer() {
                if vertices.binary_search(&x).is_ok() {
                    record_split(events, a.id, Point::new(x, y));
                }
            }
        }

        // Passing edges crossing exactly on the scan line.
        let mut start = 0;
        while start < passing.len() {
            let mut end = start + 1;
            while end < passing.len() && passing[end].curr_x == passing[start].curr_x {
                end += 1;
            }
            if end - start > 1 {
                let at = Point::new(passing[start].curr_x.round(), y);
                for i in start..end {
                    let ei = edges[passing[i].id];
                    let crosses = (start..end).any(|j| {
                        let ej = edges[passing[j].id];
                        cross_dir((ei.dx(), ei.dy()), (ej.dx(), ej.dy())) != 0
                    });
                    if crosses {
                        record_split(events, passing[i].id, at);
                    }
                }
            }
            start = end;
        }

        // Horizontal edges lying on the scan line.
        for h in horizontals {
            let (x0, x1) = (edges[h].bot.x, edges[h].top.x);
            let lo = vertices.partition_point(|&x| x <= x0);
            let hi = vertices.partition_point(|&x| x < x1);
            for &x in vertices.get(lo..hi).unwrap_or(&[]) {
                record_split(events, h, Point::new(x, y));
            }
            let (rx0, rx1) = (Rational::from_int(x0), Rational::from_int(x1));
            // The AEL is in x order, so only a contiguous run can cross.
            let first = passing.partition_point(|a| a.curr_x <= rx0);
            for a in passing[first..].iter().take_while(|a| a.curr_x < rx1) {
                let at = Point::new(a.curr_x.round(), y);
                log::trace!("edge {} crosses horizontal {} at {:?}", a.id, h, at);
                record_split(events, h, at);
                record_split(events, a.id, at);
            }
        }
    }

    /// Add sloped edges starting on this scan line to the AEL at their x
    /// position.
    fn insert_local_minima(&mut self, y: i64) {
        while let Some(&id) = self.minima.get(self.next_minimum) {
            let bot = self.edges[id].bot;
            if bot.y != y {
                break;
            }
            let x = Rational::from_int(bot.x);
            let at = self.active.partition_point(|a| a.curr_x <= x);
            self.active.insert(
                at,
                ActiveEdge {
                    id,
                    curr_x: x,
                    next_x: x,
                },
            );
            self.next_minimum += 1;
        }
    }

    /// Order the AEL at `y`, then bubble it into order at `next_y`; each
    /// adjacent swap is one crossing strictly inside the beam.
    fn process_intersections(&mut self, y: i64, next_y: i64) {
        let edges = &self.edges;
        for a in &mut self.active {
            a.curr_x = edges[a.id].x_at(y);
            a.next_x = edges[a.id].x_at(next_y);
        }
        insertion_sort_by(&mut self.active, |a, b| {
            a.curr_x
                .cmp(&b.curr_x)
                .then(a.next_x.cmp(&b.next_x))
                .then(a.id.cmp(&b.id))
        });

        self.crossings.clear();
        for i in 1..self.active.len() {
            let mut j = i;
            while j > 0 && self.active[j - 1].next_x > self.active[j].next_x {
                self.crossings.push((self.active[j - 1].id, self.active[j].id));
                self.active.swap(j - 1, j);
                j -= 1;
            }
        }

        for &(a, b) in &self.crossings {
            let (ea, eb) = (self.edges[a], self.edges[b]);
            match segment_intersection(ea.bot, ea.top, eb.bot, eb.top) {
                Some(at) => {
                    log::trace!("edges {} and {} cross at {:?}", a, b, at);
                    record_split(&mut self.events, a, at);
                    record_split(&mut self.events, b, at);
                }
                None => log::warn!("edges {} and {} swapped without meeting", a, b),
            }
        }
    }

    /// Cut every edge at its recorded points. The first piece keeps the
    /// edge's id; the rest are appended. Returns the number of edges cut.
    fn apply_splits(&mut self) -> usize {
        let mut events = std::mem::take(&mut self.events);
        events.sort_unstable();
        events.dedup();

        let mut by_edge: BTreeMap<EdgeId, Vec<Point>> = BTreeMap::new();
        for ev in events {
            by_edge
                .entry(ev.edge)
                .or_default()
                .push(Point::new(ev.x, ev.y));
        }

        let mut count = 0;
        for (id, mut points) in by_edge {
            let edge = self.edges[id];
            let (from, to) = edge.directed();
            points.retain(|p| *p != from && *p != to);
            if points.is_empty() {
                continue;
            }
            let dir = (to.x - from.x, to.y - from.y);
            points.sort_by_key(|p| (dot_dir((p.x - from.x, p.y - from.y), dir), p.y, p.x));
            points.dedup();

            let mut chain = Vec::with_capacity(points.len() + 2);
            chain.push(from);
            chain.extend(points);
            chain.push(to);
            let mut pieces = chain
                .windows(2)
                .filter_map(|w| Edge::from_directed(w[0], w[1], edge.kind, edge.ring));
            if let Some(first) = pieces.next() {
                self.edges[id] = first;
            }
            self.edges.extend(pieces);
            count += 1;
        }
        count
    }
}

fn record_split(events: &mut Vec<SplitEvent>, edge: EdgeId, at: Point) {
    events.push(SplitEvent {
        y: at.y,
        x: at.x,
        edge,
    });
}

/// Stable insertion sort. Linear when `v` is already nearly in order,
/// which holds for the AEL between consecutive scan lines.
pub(crate) fn insertion_sort_by<T, F>(v: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(&v[j - 1], &v[j]) == Ordering::Greater {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}
