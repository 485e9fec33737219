use serde::{Deserialize, Serialize};

use crate::geometry::{locate_point, Point, PointLocation};
use crate::polygon::{PolygonSet, Ring};
use crate::spatial::{RingEntry, RingIndex};

/// One ring of a result together with its place in the nesting forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyNode {
    pub ring: Ring,
    /// Smallest enclosing ring of the opposite orientation.
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl PolyNode {
    pub fn is_hole(&self) -> bool {
        self.ring.is_hole()
    }
}

/// Containment forest over the rings of a result.
///
/// Holes hang below the outer contour that encloses them, islands inside a
/// hole hang below that hole, so orientation alternates with depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
}

impl PolyTree {
    /// Resolve nesting for a list of simple, mutually non-crossing rings.
    pub fn from_rings(rings: Vec<Ring>) -> Self {
        let entries = rings
            .iter()
            .enumerate()
            .map(|(ring_index, ring)| RingEntry {
                ring_index,
                bbox: ring.bbox(),
            })
            .collect();
        let index = RingIndex::build(entries);
        let areas: Vec<i128> = rings.iter().map(Ring::area2).collect();

        let mut parents = vec![None; rings.len()];
        for (i, ring) in rings.iter().enumerate() {
            let mut candidates: Vec<usize> = index
                .query_enclosing(&ring.bbox())
                .iter()
                .map(|entry| entry.ring_index)
                .filter(|&j| {
                    j != i
                        && (areas[j] > 0) != (areas[i] > 0)
                        && areas[j].abs() > areas[i].abs()
                })
                .collect();
            candidates.sort_by_key(|&j| (areas[j].abs(), j));
            parents[i] = candidates
                .into_iter()
                .find(|&j| encloses(&rings[j], ring));
        }

        let mut nodes: Vec<PolyNode> = rings
            .into_iter()
            .zip(&parents)
            .map(|(ring, &parent)| PolyNode {
                ring,
                parent,
                children: Vec::new(),
            })
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                nodes[p].children.push(i);
            }
        }
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PolyNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&PolyNode> {
        self.nodes.get(index)
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|n| n.parent)
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.nodes
            .get(index)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(index);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.nodes.iter().map(|n| &n.ring)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn outer_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_hole()).count()
    }

    pub fn hole_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_hole()).count()
    }

    /// Twice the covered area (holes subtract).
    pub fn area2(&self) -> i128 {
        self.rings().map(Ring::area2).sum()
    }

    pub fn area(&self) -> f64 {
        self.area2() as f64 / 2.0
    }

    pub fn to_polygon_set(&self) -> PolygonSet {
        PolygonSet::from_rings(self.rings().cloned().collect())
    }

    pub fn into_polygon_set(self) -> PolygonSet {
        PolygonSet::from_rings(self.nodes.into_iter().map(|n| n.ring).collect())
    }
}

/// True when `inner` lies inside `outer`. Rings may share vertices but
/// must not cross.
fn encloses(outer: &Ring, inner: &Ring) -> bool {
    for &p in inner.points() {
        match outer.locate(p) {
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
            PointLocation::OnBoundary => {}
        }
    }
    // Every vertex touches; decide on edge midpoints in doubled coordinates.
    let doubled: Vec<Point> = outer
        .points()
        .iter()
        .map(|p| Point::new(p.x * 2, p.y * 2))
        .collect();
    for (a, b) in inner.edges() {
        match locate_point(Point::new(a.x + b.x, a.y + b.y), &doubled) {
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
            PointLocation::OnBoundary => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i64, y0: i64, x1: i64, y1: i64, ccw: bool) -> Ring {
        let mut pts = vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ];
        if !ccw {
            pts.reverse();
        }
        Ring::new(pts).unwrap()
    }

    #[test]
    fn test_nested_forest() {
        let tree = PolyTree::from_rings(vec![
            square(20, 20, 80, 80, false), // hole
            square(0, 0, 100, 100, true),  // outer
            square(40, 40, 60, 60, true),  // island in the hole
            square(200, 0, 300, 100, true),
        ]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.parent(0), Some(1));
        assert_eq!(tree.parent(1), None);
        assert_eq!(tree.parent(2), Some(0));
        assert_eq!(tree.parent(3), None);
        assert_eq!(tree.children(1), &[0]);
        assert_eq!(tree.depth(2), 2);
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(tree.outer_count(), 3);
        assert_eq!(tree.hole_count(), 1);

        // Orientation alternates with depth.
        for i in 0..tree.len() {
            let hole = tree.nodes()[i].is_hole();
            assert_eq!(hole, tree.depth(i) % 2 == 1);
        }
    }

    #[test]
    fn test_hole_touching_outer_at_vertex() {
        // Triangle hole whose apex touches the outer boundary.
        let hole = Ring::new(vec![
            Point::new(50, 0),
            Point::new(40, 20),
            Point::new(60, 20),
        ])
        .unwrap();
        assert!(hole.is_hole());
        let tree = PolyTree::from_rings(vec![square(0, 0, 100, 100, true), hole]);
        assert_eq!(tree.parent(1), Some(0));
    }

    #[test]
    fn test_area_and_conversion() {
        let tree = PolyTree::from_rings(vec![
            square(0, 0, 10, 10, true),
            square(2, 2, 4, 4, false),
        ]);
        assert_eq!(tree.area2(), 200 - 8);
        assert!((tree.area() - 96.0).abs() < 1e-10);
        let set = tree.to_polygon_set();
        assert_eq!(set.len(), 2);
        assert_eq!(tree.into_polygon_set(), set);
    }
}
