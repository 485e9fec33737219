use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::BBox;

/// An entry in the R-tree, referencing a ring by its index.
#[derive(Debug, Clone)]
pub struct RingEntry {
    /// Index into the ring list the index was built from.
    pub ring_index: usize,
    /// Bounding box of the ring.
    pub bbox: BBox,
}

impl RTreeObject for RingEntry {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Bounding-box index over rings, used to find enclosing-ring candidates.
pub struct RingIndex {
    tree: RTree<RingEntry>,
}

impl RingIndex {
    pub fn build(entries: Vec<RingEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All entries whose bounding box fully covers `bbox`.
    pub fn query_enclosing(&self, bbox: &BBox) -> Vec<&RingEntry> {
        let envelope = AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.bbox.contains_bbox(bbox))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
