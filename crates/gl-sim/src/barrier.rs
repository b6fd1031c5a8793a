//! The reversal barrier.
//!
//! The commute direction is part of [`SimState`], which the barrier reads
//! and replaces as a whole.  [`evaluate`] is the pure transition; the
//! scheduled [`ReversalBarrier`] task applies its outcome to the world.

use gl_core::{Direction, Tick};
use gl_mobility::Agent;

use crate::{Steppable, World};

/// Process-wide simulation state replaced by the barrier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimState {
    /// Orientation new agents are created with.
    pub direction: Direction,
    /// Completed reversals.
    pub reversals: u64,
    pub last_reversal: Option<Tick>,
}

/// What one barrier evaluation decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BarrierOutcome {
    /// At least one agent is still travelling; nothing changes.
    Waiting { pending: usize },
    /// Every agent arrived; all of them must now reverse.
    Reversed { direction: Direction },
}

/// `true` when every agent in `roster` has arrived (vacuously for none).
pub fn all_arrived<A: Agent>(roster: &[A]) -> bool {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        roster.par_iter().all(|a| a.has_arrived())
    }

    #[cfg(not(feature = "parallel"))]
    {
        roster.iter().all(|a| a.has_arrived())
    }
}

/// Decide the next state from the current one and the roster.
pub fn evaluate<A: Agent>(state: SimState, roster: &[A], tick: Tick) -> (SimState, BarrierOutcome) {
    if !all_arrived(roster) {
        let pending = roster.iter().filter(|a| !a.has_arrived()).count();
        return (state, BarrierOutcome::Waiting { pending });
    }
    let direction = state.direction.flipped();
    let next = SimState {
        direction,
        reversals:     state.reversals + 1,
        last_reversal: Some(tick),
    };
    (next, BarrierOutcome::Reversed { direction })
}

/// Scheduled task running [`evaluate`] and applying the reversal.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReversalBarrier;

impl<A: Agent> Steppable<World<A>> for ReversalBarrier {
    fn step(&mut self, world: &mut World<A>, tick: Tick) {
        let (next, outcome) = evaluate(world.state(), world.roster(), tick);
        match outcome {
            BarrierOutcome::Waiting { pending } => {
                log::debug!("{tick}: {pending} agents still travelling");
            }
            BarrierOutcome::Reversed { direction } => {
                log::info!("{tick}: all {} agents arrived, heading {direction}", world.agent_count());
                world.reverse_all(tick);
            }
        }
        world.set_state(next);
    }
}
