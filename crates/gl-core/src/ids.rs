//! Strongly typed, zero-cost identifier wrappers.
//!
//! `AgentId`, `NodeId` and `EdgeId` are dense arena indices assigned by this
//! program.  `RoadId` is the stable identifier read from the road dataset; it
//! is never used as an index, only as a lookup key into the edge registry.

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent in the population roster.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a junction node in the planar road graph.
    pub struct NodeId(u32);
}

typed_id! {
    /// Arena index of a road edge in the planar graph.
    pub struct EdgeId(u32);
}

/// Stable road identifier carried as an attribute of the source geometry
/// (e.g. the `ID_ID` column of a roads shapefile).
///
/// Unique across the network; population records and the goal set refer to
/// edges by this value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoadId(pub i64);

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoadId({})", self.0)
    }
}

impl From<i64> for RoadId {
    #[inline]
    fn from(v: i64) -> Self {
        RoadId(v)
    }
}
