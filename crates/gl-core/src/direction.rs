//! Commute orientation shared by the whole population.

/// Which way the population is currently commuting.
///
/// `ToWork` is the initial state.  The reversal barrier is the only code that
/// toggles it, and only once every agent has arrived.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Home → work (`RUNNING_FORWARD`).
    #[default]
    ToWork,
    /// Work → home (`RUNNING_REVERSE`).
    ToHome,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Direction {
        match self {
            Direction::ToWork => Direction::ToHome,
            Direction::ToHome => Direction::ToWork,
        }
    }

    #[inline]
    pub fn is_to_work(self) -> bool {
        matches!(self, Direction::ToWork)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::ToWork => "to_work",
            Direction::ToHome => "to_home",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
