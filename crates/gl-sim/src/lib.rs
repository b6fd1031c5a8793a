//! `gl-sim` — discrete-event loop for the gridlock traffic simulation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`schedule`] | `Schedule<W>`, `Steppable<W>`, `Repeat` — repeating entries    |
//! | [`world`]    | `World<A>` — network, ledger, roster, agent field, `SimState`  |
//! | [`field`]    | `AgentField` — R-tree over agent positions                     |
//! | [`barrier`]  | `SimState`, `evaluate`, `ReversalBarrier`                      |
//! | [`sim`]      | `Sim<A>` — tick loop and population admission                  |
//! | [`builder`]  | `SimBuilder` — validates config, installs periodic tasks       |
//! | [`observer`] | `SimObserver`, `NoopObserver`                                  |
//! | [`error`]    | `SimError`, `SimResult<T>`                                     |
//!
//! # Tick protocol
//!
//! ```text
//! for tick in 0..:
//!   ordering 0  every admitted agent steps once, in admission order
//!   ordering 1  every `barrier_interval_ticks` (first at that tick):
//!                 any agent not arrived → no-op
//!                 all arrived           → flip direction, reverse every agent
//!   ordering 2  every `index_refresh_interval_ticks` (first at tick 0):
//!                 rebuild the agent spatial index
//! ```
//!
//! Everything runs on one thread; the barrier always sees the state after
//! every agent has finished its step for the tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Barrier arrival scan runs on Rayon's thread pool.       |

pub mod barrier;
pub mod builder;
pub mod error;
pub mod field;
pub mod observer;
pub mod schedule;
pub mod sim;
pub mod world;

#[cfg(test)]
mod tests;

pub use barrier::{BarrierOutcome, ReversalBarrier, SimState};
pub use builder::{SimBuilder, AGENT_ORDERING, BARRIER_ORDERING, REFRESH_ORDERING};
pub use error::{SimError, SimResult};
pub use field::AgentField;
pub use observer::{NoopObserver, SimObserver};
pub use schedule::{EntryId, Repeat, Schedule, Steppable};
pub use sim::Sim;
pub use world::{AgentStep, IndexRefresh, World};
