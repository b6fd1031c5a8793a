//! Road network representation and builder.
//!
//! # Planar graph
//!
//! Every road feature becomes one undirected [`RoadEdge`] joining the node
//! at its first vertex to the node at its last vertex.  Nodes are the
//! distinct endpoint coordinates (exact equality), so two roads share a
//! junction exactly when they share an endpoint.  Intersections in the
//! interior of a polyline are not split; the input is assumed to be noded.
//!
//! # Data layout
//!
//! Edges are traversable in both directions.  Outgoing traversals use
//! **Compressed Sparse Row (CSR)** format: given a `NodeId n`, its outgoing
//! traversals occupy
//!
//! ```text
//! out_traversals[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! so iterating a node's neighbours in Dijkstra's inner loop is a contiguous
//! scan.

use std::collections::HashMap;

use gl_core::{Coord, EdgeId, Extent, NodeId, RoadId};

use crate::junction::JunctionField;
use crate::layer::RoadLayer;
use crate::line::RoadLine;
use crate::registry::EdgeRegistry;
use crate::{NetworkError, NetworkResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A traversable road segment.
#[derive(Clone, Debug)]
pub struct RoadEdge {
    /// Stable identifier from the source data.
    pub road_id: RoadId,
    /// Node at the first vertex of `line`.
    pub from:    NodeId,
    /// Node at the last vertex of `line`.
    pub to:      NodeId,
    pub line:    RoadLine,
}

impl RoadEdge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.line.length()
    }
}

/// One oriented pass over an edge: `forward` runs `from → to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Traversal {
    pub edge:    EdgeId,
    pub forward: bool,
}

impl Traversal {
    #[inline]
    pub fn reversed(self) -> Traversal {
        Traversal { edge: self.edge, forward: !self.forward }
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format, its edge registry and junction
/// markers.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Outgoing traversals grouped by source node.
    pub out_traversals: Vec<Traversal>,

    /// Edge data indexed by `EdgeId`.
    pub edges: Vec<RoadEdge>,

    registry:  EdgeRegistry,
    junctions: JunctionField,
    extent:    Extent,
}

impl RoadNetwork {
    /// A network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &RoadEdge {
        &self.edges[edge.index()]
    }

    /// The edge whose stable identifier is `road`.
    #[inline]
    pub fn edge_by_road(&self, road: RoadId) -> Option<EdgeId> {
        self.registry.get(road)
    }

    pub fn registry(&self) -> &EdgeRegistry {
        &self.registry
    }

    pub fn junctions(&self) -> &JunctionField {
        &self.junctions
    }

    /// Bounding extent of every road vertex.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// All traversals leaving `node`.  Contiguous, no allocation.
    #[inline]
    pub fn out_traversals(&self, node: NodeId) -> &[Traversal] {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        &self.out_traversals[start..end]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_traversals(node).len()
    }

    /// Node a traversal starts at.
    #[inline]
    pub fn source(&self, t: Traversal) -> NodeId {
        let e = self.edge(t.edge);
        if t.forward { e.from } else { e.to }
    }

    /// Node a traversal ends at.
    #[inline]
    pub fn target(&self, t: Traversal) -> NodeId {
        let e = self.edge(t.edge);
        if t.forward { e.to } else { e.from }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use gl_core::{Coord, RoadId};
/// use gl_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_road(RoadId(10), vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 100.0, y: 0.0 }]).unwrap();
/// b.add_road(RoadId(20), vec![Coord { x: 100.0, y: 0.0 }, Coord { x: 100.0, y: 50.0 }]).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 3);
/// assert_eq!(net.edge_count(), 2);
/// assert!(net.edge_by_road(RoadId(20)).is_some());
/// ```
pub struct RoadNetworkBuilder {
    nodes:       Vec<Coord>,
    node_lookup: HashMap<(u64, u64), NodeId>,
    edges:       Vec<RoadEdge>,
    registry:    EdgeRegistry,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-allocate for the expected number of roads.
    pub fn with_capacity(roads: usize) -> Self {
        Self {
            nodes:       Vec::with_capacity(roads),
            node_lookup: HashMap::with_capacity(roads),
            edges:       Vec::with_capacity(roads),
            registry:    EdgeRegistry::with_capacity(roads),
        }
    }

    /// Build the planar graph for every feature of `layer`, reading each
    /// feature's identifier from attribute `id_field`.
    ///
    /// A feature without the attribute, with a non-integer value, or with a
    /// duplicate identifier aborts construction.
    pub fn from_layer(layer: &RoadLayer, id_field: &str) -> NetworkResult<RoadNetwork> {
        log::info!("creating network from {} road features...", layer.len());
        let mut b = Self::with_capacity(layer.len());

        for (i, feature) in layer.features.iter().enumerate() {
            let value = feature.attribute(id_field).ok_or_else(|| {
                NetworkError::MissingAttribute { field: id_field.to_string(), feature: i }
            })?;
            let road = value.as_i64().map(RoadId).ok_or_else(|| {
                NetworkError::InvalidAttribute {
                    field:   id_field.to_string(),
                    feature: i,
                    value:   value.to_string(),
                }
            })?;

            // Multi-part features are joined end to end into one polyline.
            let coords: Vec<Coord> = feature.parts.iter().flatten().copied().collect();
            if feature.parts.len() > 1 {
                log::debug!("road {road}: joined {} parts into one edge", feature.parts.len());
            }
            b.add_road_from_feature(road, coords, i)?;
        }

        let net = b.build();
        log::info!(
            "finished creating network: {} nodes, {} edges",
            net.node_count(),
            net.edge_count()
        );
        Ok(net)
    }

    /// Node at exactly `pos`, creating it on first use.
    pub fn node_at(&mut self, pos: Coord) -> NodeId {
        let key = coord_key(pos);
        if let Some(&id) = self.node_lookup.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.node_lookup.insert(key, id);
        id
    }

    /// Add a road along `coords` (at least two vertices) identified by `road`.
    pub fn add_road(&mut self, road: RoadId, coords: Vec<Coord>) -> NetworkResult<EdgeId> {
        let feature = self.edges.len();
        self.add_road_from_feature(road, coords, feature)
    }

    fn add_road_from_feature(
        &mut self,
        road:    RoadId,
        coords:  Vec<Coord>,
        feature: usize,
    ) -> NetworkResult<EdgeId> {
        let line = RoadLine::new(coords).ok_or_else(|| NetworkError::UnsupportedGeometry {
            feature,
            reason: "fewer than two vertices".to_string(),
        })?;
        let edge = EdgeId(self.edges.len() as u32);
        self.registry.insert(road, edge)?;

        let from = self.node_at(line.first());
        let to   = self.node_at(line.last());
        self.edges.push(RoadEdge { road_id: road, from, to, line });
        Ok(edge)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Two traversals per edge, one leaving each endpoint.
        let mut half: Vec<(NodeId, Traversal)> = Vec::with_capacity(self.edges.len() * 2);
        for (i, e) in self.edges.iter().enumerate() {
            let edge = EdgeId(i as u32);
            half.push((e.from, Traversal { edge, forward: true }));
            half.push((e.to, Traversal { edge, forward: false }));
        }
        half.sort_by_key(|(src, t)| (src.0, t.edge.0, !t.forward));

        let mut node_out_start = vec![0u32; node_count + 1];
        for (src, _) in &half {
            node_out_start[src.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, half.len());

        let out_traversals = half.into_iter().map(|(_, t)| t).collect();
        let junctions = JunctionField::from_nodes(&self.nodes);
        let extent = Extent::from_coords(
            self.edges.iter().flat_map(|e| e.line.coords().iter().copied()),
        );

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            out_traversals,
            edges: self.edges,
            registry: self.registry,
            junctions,
            extent,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hashable key for exact coordinate equality (`-0.0` folds into `0.0`).
#[inline]
fn coord_key(c: Coord) -> (u64, u64) {
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}
