//! The `TrafficLedger` — which agents occupy which edge.

use gl_core::{AgentId, EdgeId};

/// Per-edge occupant lists plus the reverse agent → edge map.
///
/// `occupants` is indexed by `EdgeId` and sized once from the network; lists
/// are mutated in place and never replaced.  Within a list agents appear in
/// the order they entered the edge.
///
/// `location` is indexed by `AgentId` and grows on demand; `EdgeId::INVALID`
/// marks an agent that is currently on no edge.
#[derive(Clone, Debug, Default)]
pub struct TrafficLedger {
    occupants: Vec<Vec<AgentId>>,
    location:  Vec<EdgeId>,
}

impl TrafficLedger {
    /// An empty ledger for a network with `edge_count` edges.
    pub fn new(edge_count: usize) -> Self {
        Self {
            occupants: vec![Vec::new(); edge_count],
            location:  Vec::new(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.occupants.len()
    }

    /// Agents on `edge`, in entry order.
    #[inline]
    pub fn occupants(&self, edge: EdgeId) -> &[AgentId] {
        &self.occupants[edge.index()]
    }

    /// Number of agents on `edge`.
    #[inline]
    pub fn occupancy(&self, edge: EdgeId) -> usize {
        self.occupants[edge.index()].len()
    }

    /// The edge `agent` currently occupies, if any.
    #[inline]
    pub fn edge_of(&self, agent: AgentId) -> Option<EdgeId> {
        match self.location.get(agent.index()) {
            Some(&e) if e != EdgeId::INVALID => Some(e),
            _ => None,
        }
    }

    /// Move `agent` onto `to` (or off the network with `None`).
    ///
    /// The agent is removed from its previous list before it is appended to
    /// the new one.  Moving onto the edge it already occupies is a no-op and
    /// keeps its place in the list.  Returns the previous edge.
    pub fn move_agent(&mut self, agent: AgentId, to: Option<EdgeId>) -> Option<EdgeId> {
        let from = self.edge_of(agent);
        if from == to {
            return from;
        }

        if let Some(prev) = from {
            let list = &mut self.occupants[prev.index()];
            if let Some(pos) = list.iter().position(|&a| a == agent) {
                list.remove(pos);
            }
        }

        if agent.index() >= self.location.len() {
            self.location.resize(agent.index() + 1, EdgeId::INVALID);
        }
        match to {
            Some(edge) => {
                self.occupants[edge.index()].push(agent);
                self.location[agent.index()] = edge;
            }
            None => self.location[agent.index()] = EdgeId::INVALID,
        }
        from
    }

    /// Put `agent` on `edge`.  Shorthand for `move_agent(agent, Some(edge))`.
    #[inline]
    pub fn enter(&mut self, agent: AgentId, edge: EdgeId) -> Option<EdgeId> {
        self.move_agent(agent, Some(edge))
    }

    /// Take `agent` off whatever edge it occupies.
    #[inline]
    pub fn remove(&mut self, agent: AgentId) -> Option<EdgeId> {
        self.move_agent(agent, None)
    }

    /// Total number of agents on any edge.
    pub fn total(&self) -> usize {
        self.occupants.iter().map(Vec::len).sum()
    }

    /// The edge with the most occupants (lowest `EdgeId` on ties).
    pub fn busiest(&self) -> Option<(EdgeId, usize)> {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
            .map(|(i, l)| (EdgeId(i as u32), l.len()))
    }

    /// `true` when every occupant list and the reverse map agree and no agent
    /// is listed twice.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.location.len()];
        for (i, list) in self.occupants.iter().enumerate() {
            for &a in list {
                let Some(slot) = seen.get_mut(a.index()) else { return false };
                if *slot || self.location[a.index()] != EdgeId(i as u32) {
                    return false;
                }
                *slot = true;
            }
        }
        self.location
            .iter()
            .zip(&seen)
            .all(|(&e, &s)| s == (e != EdgeId::INVALID))
    }
}
