//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest neighbor within a radius (pointer hit testing)
//! - Point-in-radius (collision candidates)

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::NodeId;

/// A point in the spatial index with associated node ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl NodePoint {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over node positions.
///
/// The index is a snapshot: it is bulk loaded from position buffers and
/// does not follow later movement. Callers rebuild it when they need fresh
/// answers.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load from SoA position buffers; slot `i` becomes `NodeId(i)`.
    pub fn from_positions(xs: &[f64], ys: &[f64]) -> Self {
        let mut index = Self::new();
        index.rebuild(xs, ys);
        index
    }

    /// Replace the contents with the given positions.
    ///
    /// Bulk loading produces a better-balanced tree than repeated inserts.
    pub fn rebuild(&mut self, xs: &[f64], ys: &[f64]) {
        let points: Vec<_> = xs
            .iter()
            .zip(ys)
            .enumerate()
            .map(|(i, (&x, &y))| NodePoint::new(NodeId(i as u32), x, y))
            .collect();
        self.tree = RTree::bulk_load(points);
    }

    /// Find the nearest node within `max_distance` (inclusive).
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.id)
    }

    /// Visit every node within `radius` of a point.
    pub fn for_each_in_radius(&self, x: f64, y: f64, radius: f64, mut f: impl FnMut(&NodePoint)) {
        for point in self.tree.locate_within_distance([x, y], radius * radius) {
            f(point);
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
