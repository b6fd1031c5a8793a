//! Simulation time model.
//!
//! Time is a monotonically increasing integer `Tick`.  One tick is one
//! scheduler step: every agent moves once, then any periodic tasks due on
//! that tick run.  There is no mapping to wall-clock time; the movement rate
//! of agents is expressed in map units per tick.

use std::fmt;

use crate::{GlError, GlResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`, saturating at `u64::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self` (zero if `earlier > self`).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Scheduler configuration.
///
/// Typically loaded from the `[sim]` table of a TOML/JSON file by the
/// application crate and passed to the simulation runner.  Missing keys take
/// the values from [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Ticks to simulate.  `None` runs until the process is stopped.
    pub total_ticks: Option<u64>,

    /// The reversal barrier runs every N ticks (first at tick N).  Default 10.
    pub barrier_interval_ticks: u64,

    /// Agent spatial-index refresh runs at tick 0 and then every N ticks.
    /// The default `u64::MAX` means it effectively runs once.
    pub index_refresh_interval_ticks: u64,

    /// Emit a progress log line every N ticks.  0 disables progress logging.
    pub progress_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive), if bounded.
    #[inline]
    pub fn end_tick(&self) -> Option<Tick> {
        self.total_ticks.map(Tick)
    }

    /// Reject intervals the scheduler cannot repeat.
    pub fn validate(&self) -> GlResult<()> {
        if self.barrier_interval_ticks == 0 {
            return Err(GlError::Config("barrier_interval_ticks must be > 0".to_string()));
        }
        if self.index_refresh_interval_ticks == 0 {
            return Err(GlError::Config("index_refresh_interval_ticks must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                         0,
            total_ticks:                  None,
            barrier_interval_ticks:       10,
            index_refresh_interval_ticks: u64::MAX,
            progress_interval_ticks:      1_000,
        }
    }
}
