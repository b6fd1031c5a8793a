//! `gl-population` — turns the commuter table into admitted trips.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`record`]  | `CommuterRecord`, `PopulationColumns`, `RecordReader`           |
//! | [`goals`]   | `GoalSet` — validated destination edges                         |
//! | [`loader`]  | `PopulationLoader`, `Replication`, `LoadReport`                 |
//! | [`error`]   | `PopulationError`, `PopulationResult<T>`                        |
//!
//! # Failure policy
//!
//! | Failure                               | Effect                                |
//! |---------------------------------------|---------------------------------------|
//! | empty goal set, goal not in registry  | `GoalSet::resolve` error (fatal)      |
//! | malformed row, unreadable file        | load stops, `LoadReport::aborted`     |
//! | unknown start road                    | row skipped, counted                  |
//! | agent start fails                     | agent skipped, counted                |

pub mod error;
pub mod goals;
pub mod loader;
pub mod record;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use goals::GoalSet;
pub use loader::{LoadReport, PopulationLoader, Replication};
pub use record::{CommuterRecord, PopulationColumns, RecordReader};
