//! Junction markers: one point per graph node.
//!
//! Produced by the network builder for display and spatial lookup; nothing in
//! the movement model depends on them.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use gl_core::{Coord, Extent, NodeId};

/// A point marker at a road junction (graph node).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Junction {
    pub node:     NodeId,
    pub position: Coord,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct JunctionEntry {
    point: [f64; 2], // [x, y]
    node:  NodeId,
}

impl RTreeObject for JunctionEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for JunctionEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── JunctionField ─────────────────────────────────────────────────────────────

/// Every junction marker of a network plus an R-tree over their positions.
pub struct JunctionField {
    markers: Vec<Junction>,
    index:   RTree<JunctionEntry>,
}

impl JunctionField {
    /// Bulk-load from node positions indexed by `NodeId`.
    pub fn from_nodes(node_pos: &[Coord]) -> Self {
        let markers: Vec<Junction> = node_pos
            .iter()
            .enumerate()
            .map(|(i, &position)| Junction { node: NodeId(i as u32), position })
            .collect();
        let entries = markers
            .iter()
            .map(|j| JunctionEntry { point: [j.position.x, j.position.y], node: j.node })
            .collect();
        Self { markers, index: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// All markers in `NodeId` order.
    pub fn markers(&self) -> &[Junction] {
        &self.markers
    }

    /// Nearest junction to `pos`, or `None` for an empty field.
    pub fn nearest(&self, pos: Coord) -> Option<NodeId> {
        self.index.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.node)
    }

    /// Up to `k` junctions nearest to `pos`, ascending distance.
    pub fn k_nearest(&self, pos: Coord, k: usize) -> Vec<NodeId> {
        self.index
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.node)
            .collect()
    }

    /// All junctions within `radius` map units of `pos`.
    pub fn within(&self, pos: Coord, radius: f64) -> Vec<NodeId> {
        self.index
            .locate_within_distance([pos.x, pos.y], radius * radius)
            .map(|e| e.node)
            .collect()
    }

    pub fn extent(&self) -> Extent {
        Extent::from_coords(self.markers.iter().map(|j| j.position))
    }
}
