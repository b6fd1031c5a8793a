//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Agents plan their commute through the [`Router`] trait, so applications
//! can swap in A* or a congestion-aware cost without touching the agents.
//!
//! # Cost units
//!
//! Costs are integer milli-map-units (`round(length * 1000)`), which keeps
//! the heap ordering exact and ties deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gl_core::NodeId;

use crate::network::{RoadNetwork, Traversal};
use crate::NetworkError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// Ordered oriented edges from source node to destination node.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub steps:  Vec<Traversal>,
    /// Sum of edge lengths in map units.
    pub length: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields an empty route rather than an error.
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
    ) -> Result<Route, NetworkError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Shortest path by edge length over the undirected road graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
    ) -> Result<Route, NetworkError> {
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost(network: &RoadNetwork, t: Traversal) -> u64 {
    (network.edge(t.edge).length() * 1000.0).round() as u64
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<Route, NetworkError> {
    let n = network.node_count();
    if from.index() >= n || to.index() >= n {
        return Err(NetworkError::NoRoute { from, to });
    }
    if from == to {
        return Ok(Route { steps: vec![], length: 0.0 });
    }

    let mut dist = vec![u64::MAX; n];
    // prev[v] = traversal that reached v.
    let mut prev: Vec<Option<Traversal>> = vec![None; n];

    dist[from.index()] = 0;

    // Min-heap on (cost, node); NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev, from, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for &t in network.out_traversals(node) {
            let neighbor = network.target(t);
            let new_cost = cost.saturating_add(edge_cost(network, t));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = Some(t);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(
    network: &RoadNetwork,
    prev:    &[Option<Traversal>],
    from:    NodeId,
    to:      NodeId,
) -> Route {
    let mut steps = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(t) = prev[cur.index()] else { break };
        steps.push(t);
        cur = network.source(t);
    }
    steps.reverse();
    let length = steps.iter().map(|t| network.edge(t.edge).length()).sum();
    Route { steps, length }
}
