//! `gl-core` — foundational types for the `gridlock` traffic simulation.
//!
//! This crate is a dependency of every other `gl-*` crate.  It has no `gl-*`
//! dependencies and few external ones (`rand`, `thiserror`, `geo-types`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `RoadId`               |
//! | [`geo`]         | `Coord`, `Extent` (bounding rectangle)                |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`direction`]   | `Direction` commute orientation                       |
//! | [`rng`]         | `SimRng` (global, seeded)                             |
//! | [`error`]       | `GlError`, `GlResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and id types.     |

pub mod direction;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use direction::Direction;
pub use error::{GlError, GlResult};
pub use geo::{Coord, Extent};
pub use ids::{AgentId, EdgeId, NodeId, RoadId};
pub use rng::SimRng;
pub use time::{SimConfig, Tick};
