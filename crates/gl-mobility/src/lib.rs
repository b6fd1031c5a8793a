//! `gl-mobility` — per-edge occupancy and the agents that move over it.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`ledger`]   | `TrafficLedger` — edge → ordered occupants, agent → edge         |
//! | [`agent`]    | `Agent` capability trait, `MoveContext`, `Trip`, `AgentFactory`  |
//! | [`commuter`] | `Commuter<R>` — route following with congestion-sensitive speed  |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                             |
//!
//! # Movement model
//!
//! Agents move a continuous distance along their current edge every tick.
//! The ledger is the only shared mutable structure they touch: an agent
//! enters an edge's occupant list when it starts moving along it and leaves
//! it when it passes the edge's end.  [`TrafficLedger::move_agent`] performs
//! both halves in one call so an agent is never listed on two edges.

pub mod agent;
pub mod commuter;
pub mod error;
pub mod ledger;


pub use agent::{Agent, AgentFactory, MoveContext, Trip};
pub use commuter::{congestion_factor, Commuter, CommuterFactory, DEFAULT_MOVE_RATE};
pub use error::{MobilityError, MobilityResult};
pub use ledger::TrafficLedger;
