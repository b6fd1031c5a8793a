//! Spatial field over agent positions.
//!
//! Positions are written as agents move; the R-tree is rebuilt only by
//! [`AgentField::refresh`].  Queries answer against the last refresh.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use gl_core::{AgentId, Coord, Extent, Tick};

#[derive(Clone)]
struct AgentEntry {
    point: [f64; 2],
    agent: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Movable agent geometries, indexed by `AgentId`.
pub struct AgentField {
    positions:    Vec<Coord>,
    index:        RTree<AgentEntry>,
    extent:       Extent,
    last_refresh: Option<Tick>,
}

impl AgentField {
    pub fn new(extent: Extent) -> Self {
        Self {
            positions:    Vec::new(),
            index:        RTree::new(),
            extent,
            last_refresh: None,
        }
    }

    /// Register the geometry of `agent`, which must be the next id.
    pub fn insert(&mut self, agent: AgentId, position: Coord) {
        debug_assert_eq!(agent.index(), self.positions.len());
        self.positions.push(position);
        self.index.insert(AgentEntry { point: [position.x, position.y], agent });
    }

    /// Record the current position of `agent`.  Not visible to queries
    /// until the next refresh.
    #[inline]
    pub fn set_position(&mut self, agent: AgentId, position: Coord) {
        self.positions[agent.index()] = position;
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Coord {
        self.positions[agent.index()]
    }

    /// Rebuild the index from the current positions.
    pub fn refresh(&mut self, tick: Tick) {
        let entries = (0..)
            .map(AgentId)
            .zip(&self.positions)
            .map(|(agent, p)| AgentEntry { point: [p.x, p.y], agent })
            .collect();
        self.index = RTree::bulk_load(entries);
        self.last_refresh = Some(tick);
    }

    pub fn last_refresh(&self) -> Option<Tick> {
        self.last_refresh
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Shared bounding rectangle of the model (roads and areas).
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Nearest agent to `pos` as of the last refresh.
    pub fn nearest(&self, pos: Coord) -> Option<AgentId> {
        self.index.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.agent)
    }

    /// Agents within `radius` of `pos` as of the last refresh.
    pub fn within(&self, pos: Coord, radius: f64) -> Vec<AgentId> {
        let mut found: Vec<AgentId> = self
            .index
            .locate_within_distance([pos.x, pos.y], radius * radius)
            .map(|e| e.agent)
            .collect();
        found.sort_unstable();
        found
    }
}
