//! The mutable state the schedule runs against.

use std::sync::Arc;

use gl_core::{AgentId, Extent, Tick};
use gl_mobility::{Agent, MoveContext, TrafficLedger};
use gl_network::RoadNetwork;

use crate::{AgentField, SimState, Steppable};

/// Road network, traffic ledger, agent roster and agent field.
///
/// The roster is indexed by `AgentId` and only grows.  Every admitted agent
/// has a geometry in the field at the same index.
pub struct World<A: Agent> {
    network: Arc<RoadNetwork>,
    ledger:  TrafficLedger,
    roster:  Vec<A>,
    field:   AgentField,
    state:   SimState,
}

impl<A: Agent> World<A> {
    /// An empty world over `network`.  `extent` is the shared model
    /// rectangle; it is widened to cover the network.
    pub fn new(network: Arc<RoadNetwork>, extent: Extent) -> Self {
        let mut mbr = network.extent();
        mbr.expand_to_include(&extent);
        Self {
            ledger:  TrafficLedger::new(network.edge_count()),
            roster:  Vec::new(),
            field:   AgentField::new(mbr),
            state:   SimState::default(),
            network,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Shared handle to the network, for callers that must borrow it while
    /// mutating the world.
    pub fn network_arc(&self) -> Arc<RoadNetwork> {
        Arc::clone(&self.network)
    }

    pub fn ledger(&self) -> &TrafficLedger {
        &self.ledger
    }

    pub fn roster(&self) -> &[A] {
        &self.roster
    }

    pub fn agent(&self, id: AgentId) -> Option<&A> {
        self.roster.get(id.index())
    }

    pub fn field(&self) -> &AgentField {
        &self.field
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SimState) {
        self.state = state;
    }

    pub fn agent_count(&self) -> usize {
        self.roster.len()
    }

    /// The id the next admitted agent will receive, or `None` once every
    /// valid `AgentId` is taken.
    pub fn next_agent_id(&self) -> Option<AgentId> {
        AgentId::try_from(self.roster.len())
            .ok()
            .filter(|&id| id != AgentId::INVALID)
    }

    pub fn arrived_count(&self) -> usize {
        self.roster.iter().filter(|a| a.has_arrived()).count()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Start `agent` under the next id.  On success its geometry joins the
    /// field and it joins the roster; on failure, or with the id space
    /// exhausted, nothing changes.
    pub fn admit(&mut self, mut agent: A, tick: Tick) -> Option<AgentId> {
        let id = self.next_agent_id()?;
        let mut ctx = MoveContext::new(id, &self.network, &mut self.ledger, tick);
        if !agent.start(&mut ctx) {
            return None;
        }
        self.field.insert(id, agent.position());
        self.roster.push(agent);
        Some(id)
    }

    /// One movement step for `id`.
    pub fn step_agent(&mut self, id: AgentId, tick: Tick) {
        let Some(agent) = self.roster.get_mut(id.index()) else { return };
        let mut ctx = MoveContext::new(id, &self.network, &mut self.ledger, tick);
        agent.step(&mut ctx);
        self.field.set_position(id, agent.position());
    }

    /// Reverse every agent in roster order.
    pub fn reverse_all(&mut self, tick: Tick) {
        for (id, agent) in (0..).map(AgentId).zip(self.roster.iter_mut()) {
            let mut ctx = MoveContext::new(id, &self.network, &mut self.ledger, tick);
            agent.reverse(&mut ctx);
            self.field.set_position(id, agent.position());
        }
    }

    pub fn refresh_field(&mut self, tick: Tick) {
        self.field.refresh(tick);
    }
}

// ── Scheduled tasks ───────────────────────────────────────────────────────────

/// Steps one agent per run.
#[derive(Copy, Clone, Debug)]
pub struct AgentStep(pub AgentId);

impl<A: Agent> Steppable<World<A>> for AgentStep {
    fn step(&mut self, world: &mut World<A>, tick: Tick) {
        world.step_agent(self.0, tick);
    }
}

/// Rebuilds the agent spatial index.
#[derive(Copy, Clone, Debug, Default)]
pub struct IndexRefresh;

impl<A: Agent> Steppable<World<A>> for IndexRefresh {
    fn step(&mut self, world: &mut World<A>, tick: Tick) {
        world.refresh_field(tick);
    }
}
