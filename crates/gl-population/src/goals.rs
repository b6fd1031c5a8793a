//! The set of destination edges goals are drawn from.

use gl_core::{EdgeId, RoadId, SimRng};
use gl_network::EdgeRegistry;

use crate::{PopulationError, PopulationResult};

/// Validated goal roads and their edges, in configuration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSet {
    goals: Vec<(RoadId, EdgeId)>,
}

impl GoalSet {
    /// Resolve every road in `roads` through `registry`.
    ///
    /// An empty list or a road missing from the registry is an error.
    pub fn resolve(roads: &[RoadId], registry: &EdgeRegistry) -> PopulationResult<Self> {
        if roads.is_empty() {
            return Err(PopulationError::EmptyGoalSet);
        }
        let goals = roads
            .iter()
            .map(|&road| {
                registry
                    .get(road)
                    .map(|edge| (road, edge))
                    .ok_or(PopulationError::UnknownGoal(road))
            })
            .collect::<PopulationResult<Vec<_>>>()?;
        Ok(Self { goals })
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoadId, EdgeId)> + '_ {
        self.goals.iter().copied()
    }

    /// Uniformly random goal.
    pub fn choose(&self, rng: &mut SimRng) -> (RoadId, EdgeId) {
        // `resolve` guarantees at least one goal.
        self.goals[rng.gen_range(0..self.goals.len())]
    }
}
