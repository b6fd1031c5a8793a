//! Reference agent: follows a shortest-path route between its start and goal
//! edges, slowing down on crowded edges.

use gl_core::{AgentId, Coord, Direction};
use gl_network::{DijkstraRouter, RoadNetwork, Router, Traversal};

use crate::{Agent, AgentFactory, MobilityError, MobilityResult, MoveContext, Trip};

/// Map units an agent covers per tick on an uncongested edge.
pub const DEFAULT_MOVE_RATE: f64 = 70.0;

/// Speed multiplier for an edge of `length` carrying `occupancy` agents.
///
/// `min(1, 1000·length / (occupancy·5))`; an empty edge runs at full speed.
#[inline]
pub fn congestion_factor(length: f64, occupancy: usize) -> f64 {
    if occupancy == 0 {
        return 1.0;
    }
    (1000.0 * length / (occupancy as f64 * 5.0)).min(1.0)
}

// ── Commuter ──────────────────────────────────────────────────────────────────

/// A commuter shuttling between home and work along one fixed route.
///
/// The route runs from the start edge's `from` node to the goal edge's `to`
/// node.  `outbound` selects the order the route is walked in; each
/// [`reverse`](Agent::reverse) flips it.
#[derive(Clone, Debug)]
pub struct Commuter<R: Router = DijkstraRouter> {
    id:          AgentId,
    trip:        Trip,
    router:      R,
    move_rate:   f64,
    orientation: Direction,

    route:    Vec<Traversal>,
    index:    usize,
    outbound: bool,
    /// Distance travelled along the current traversal.
    offset:   f64,

    reached_destination: bool,
    position:            Coord,
}

impl<R: Router> Commuter<R> {
    pub fn new(id: AgentId, trip: Trip, direction: Direction, router: R, move_rate: f64) -> Self {
        Self {
            id,
            trip,
            router,
            move_rate,
            orientation: direction,
            route: Vec::new(),
            index: 0,
            outbound: direction.is_to_work(),
            offset: 0.0,
            reached_destination: false,
            position: Coord { x: 0.0, y: 0.0 },
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    /// Orientation the agent was created with.
    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn route(&self) -> &[Traversal] {
        &self.route
    }

    /// `true` while walking the route start → goal.
    pub fn is_outbound(&self) -> bool {
        self.outbound
    }

    /// The traversal the agent is currently on, oriented in travel direction.
    pub fn current(&self) -> Option<Traversal> {
        let t = *self.route.get(self.index)?;
        Some(if self.outbound { t } else { t.reversed() })
    }

    /// Compute the route between the trip's start and goal edges.
    pub fn plan(&self, network: &RoadNetwork) -> MobilityResult<Vec<Traversal>> {
        let from = network.edge(self.trip.start_edge).from;
        let to   = network.edge(self.trip.goal_edge).to;
        let route = self.router.route(network, from, to)?;
        if route.is_empty() {
            return Err(MobilityError::EmptyRoute { from, to });
        }
        Ok(route.steps)
    }

    fn update_position(&mut self, network: &RoadNetwork) {
        if let Some(t) = self.current() {
            self.position = network.edge(t.edge).line.point_along(self.offset, t.forward);
        }
    }

    /// Move the index one traversal further in travel direction.
    fn advance(&mut self) -> bool {
        if self.outbound {
            if self.index + 1 < self.route.len() {
                self.index += 1;
                return true;
            }
        } else if self.index > 0 {
            self.index -= 1;
            return true;
        }
        false
    }
}

impl<R: Router> Agent for Commuter<R> {
    fn start(&mut self, ctx: &mut MoveContext<'_>) -> bool {
        let route = match self.plan(ctx.network) {
            Ok(route) => route,
            Err(e) => {
                log::debug!("{}: no route for trip {} → {}: {e}", self.id, self.trip.start_road, self.trip.goal_road);
                return false;
            }
        };
        self.index = if self.outbound { 0 } else { route.len() - 1 };
        self.route = route;
        self.offset = 0.0;
        self.reached_destination = false;

        if let Some(t) = self.current() {
            ctx.ledger.enter(self.id, t.edge);
        }
        self.update_position(ctx.network);
        true
    }

    fn step(&mut self, ctx: &mut MoveContext<'_>) {
        if self.reached_destination {
            return;
        }
        let Some(t) = self.current() else { return };

        let length = ctx.network.edge(t.edge).length();
        let factor = congestion_factor(length, ctx.ledger.occupancy(t.edge));
        self.offset += self.move_rate * factor;

        // Speed is set by the edge the step began on; the distance may span
        // several short edges after it.
        while let Some(t) = self.current() {
            let length = ctx.network.edge(t.edge).length();
            if self.offset < length {
                break;
            }
            ctx.ledger.remove(self.id);
            if !self.advance() {
                self.offset = length;
                self.reached_destination = true;
                break;
            }
            self.offset -= length;
            if let Some(next) = self.current() {
                ctx.ledger.enter(self.id, next.edge);
            }
        }
        self.update_position(ctx.network);
    }

    fn has_arrived(&self) -> bool {
        self.reached_destination
    }

    fn reverse(&mut self, ctx: &mut MoveContext<'_>) {
        let Some(t) = self.current() else { return };
        let length = ctx.network.edge(t.edge).length();

        self.reached_destination = false;
        self.outbound = !self.outbound;
        self.offset = (length - self.offset).max(0.0);
        ctx.ledger.enter(self.id, t.edge);
        self.update_position(ctx.network);
    }

    fn position(&self) -> Coord {
        self.position
    }
}

// ── CommuterFactory ───────────────────────────────────────────────────────────

/// Creates [`Commuter`]s sharing one router and move rate.
#[derive(Clone, Debug)]
pub struct CommuterFactory<R: Router + Clone = DijkstraRouter> {
    pub router:    R,
    pub move_rate: f64,
}

impl<R: Router + Clone> CommuterFactory<R> {
    pub fn new(router: R, move_rate: f64) -> Self {
        Self { router, move_rate }
    }
}

impl Default for CommuterFactory<DijkstraRouter> {
    fn default() -> Self {
        Self::new(DijkstraRouter, DEFAULT_MOVE_RATE)
    }
}

impl<R: Router + Clone> AgentFactory<Commuter<R>> for CommuterFactory<R> {
    fn create(&mut self, id: AgentId, trip: &Trip, direction: Direction) -> Commuter<R> {
        Commuter::new(id, trip.clone(), direction, self.router.clone(), self.move_rate)
    }
}
