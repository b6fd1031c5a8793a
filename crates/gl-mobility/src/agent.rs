//! Agent capability trait and the context it moves through.

use gl_core::{AgentId, Coord, Direction, EdgeId, RoadId, Tick};
use gl_network::RoadNetwork;

use crate::TrafficLedger;

// ── Trip ──────────────────────────────────────────────────────────────────────

/// One commuter's trip: the tract labels and the resolved start and goal
/// edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub home_tract: String,
    pub work_tract: String,
    pub start_road: RoadId,
    pub start_edge: EdgeId,
    pub goal_road:  RoadId,
    pub goal_edge:  EdgeId,
}

// ── MoveContext ───────────────────────────────────────────────────────────────

/// Everything an agent may read or mutate during one call.
///
/// The network is shared read-only; the ledger is borrowed mutably so an
/// agent can only change its own membership while it holds the context.
pub struct MoveContext<'a> {
    pub agent:   AgentId,
    pub network: &'a RoadNetwork,
    pub ledger:  &'a mut TrafficLedger,
    pub tick:    Tick,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        agent:   AgentId,
        network: &'a RoadNetwork,
        ledger:  &'a mut TrafficLedger,
        tick:    Tick,
    ) -> Self {
        Self { agent, network, ledger, tick }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// Behaviour the scheduler and the reversal barrier rely on.
///
/// `start` is called once at admission; an agent that returns `false` is
/// discarded and must leave the ledger untouched.
///
/// `Send + Sync` lets the barrier scan the roster in parallel.
pub trait Agent: Send + Sync {
    /// Establish the initial position.  `false` rejects the agent.
    fn start(&mut self, ctx: &mut MoveContext<'_>) -> bool;

    /// Advance one tick.
    fn step(&mut self, ctx: &mut MoveContext<'_>);

    /// `true` once the current leg has reached its end.
    fn has_arrived(&self) -> bool;

    /// Turn around for the opposite leg and clear the arrival flag.
    fn reverse(&mut self, ctx: &mut MoveContext<'_>);

    /// Current position in map units.
    fn position(&self) -> Coord;
}

// ── AgentFactory ──────────────────────────────────────────────────────────────

/// Builds an agent for an admitted trip.
///
/// `direction` is the commute orientation at creation time.  Closures of the
/// same shape implement the trait.
pub trait AgentFactory<A> {
    fn create(&mut self, id: AgentId, trip: &Trip, direction: Direction) -> A;
}

impl<A, F> AgentFactory<A> for F
where
    F: FnMut(AgentId, &Trip, Direction) -> A,
{
    fn create(&mut self, id: AgentId, trip: &Trip, direction: Direction) -> A {
        self(id, trip, direction)
    }
}
