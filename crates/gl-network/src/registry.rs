//! The edge registry: stable road identifier → graph edge.
//!
//! Built once by [`RoadNetworkBuilder`](crate::RoadNetworkBuilder) and
//! read-only afterwards, so it is safe to share across threads.

use gl_core::{EdgeId, RoadId};

use crate::{NetworkError, NetworkResult};

#[cfg(feature = "fx-hash")]
type RoadMap = rustc_hash::FxHashMap<RoadId, EdgeId>;
#[cfg(not(feature = "fx-hash"))]
type RoadMap = std::collections::HashMap<RoadId, EdgeId>;

/// Maps every [`RoadId`] in the network to exactly one [`EdgeId`].
#[derive(Clone, Debug, Default)]
pub struct EdgeRegistry {
    map: RoadMap,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        let mut map = RoadMap::default();
        map.reserve(n);
        Self { map }
    }

    /// Register `road` → `edge`.  A second registration of the same road is
    /// rejected; identifiers must be unique across the network.
    pub(crate) fn insert(&mut self, road: RoadId, edge: EdgeId) -> NetworkResult<()> {
        if self.map.contains_key(&road) {
            return Err(NetworkError::DuplicateRoadId(road));
        }
        self.map.insert(road, edge);
        Ok(())
    }

    /// Look up the edge carrying `road`.
    #[inline]
    pub fn get(&self, road: RoadId) -> Option<EdgeId> {
        self.map.get(&road).copied()
    }

    /// Like [`get`](Self::get) but returns [`NetworkError::UnknownRoad`].
    pub fn resolve(&self, road: RoadId) -> NetworkResult<EdgeId> {
        self.get(road).ok_or(NetworkError::UnknownRoad(road))
    }

    #[inline]
    pub fn contains(&self, road: RoadId) -> bool {
        self.map.contains_key(&road)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All `(RoadId, EdgeId)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (RoadId, EdgeId)> + '_ {
        self.map.iter().map(|(&r, &e)| (r, e))
    }
}
