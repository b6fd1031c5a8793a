//! Simulation observer trait for progress reporting.

use gl_core::{Direction, Tick};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations.
pub trait SimObserver {
    /// Called at the very start of each tick, before any entry runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `stepped` is the number of schedule
    /// entries that ran.
    fn on_tick_end(&mut self, _tick: Tick, _stepped: usize) {}

    /// Called on a tick where the barrier reversed `agents` agents to head
    /// `direction`.
    fn on_reversal(&mut self, _tick: Tick, _direction: Direction, _agents: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
