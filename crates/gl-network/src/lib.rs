//! `gl-network` — planar road graph, edge registry, and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`layer`]     | `RoadLayer`, `RoadFeature`, `AttributeValue`, `AreaLayer`    |
//! | [`line`]      | `RoadLine` — polyline with cumulative length lookup          |
//! | [`network`]   | `RoadNetwork` (CSR adjacency), `RoadNetworkBuilder`          |
//! | [`registry`]  | `EdgeRegistry` — stable `RoadId` → `EdgeId`                  |
//! | [`junction`]  | `JunctionField` — one marker per graph node, R-tree indexed  |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                    |
//! | [`shp`]       | shapefile readers (feature = `"shapefile"` only)             |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag        | Effect                                                   |
//! |-------------|----------------------------------------------------------|
//! | `shapefile` | Enables `.shp` + `.dbf` loading via the `shapefile` crate. |
//! | `fx-hash`   | FxHash for the edge registry map.                        |

pub mod error;
pub mod junction;
pub mod layer;
pub mod line;
pub mod network;
pub mod registry;
pub mod router;

#[cfg(feature = "shapefile")]
pub mod shp;


pub use error::{NetworkError, NetworkResult};
pub use junction::{Junction, JunctionField};
pub use layer::{AreaLayer, AttributeValue, RoadFeature, RoadLayer};
pub use line::RoadLine;
pub use network::{RoadEdge, RoadNetwork, RoadNetworkBuilder, Traversal};
pub use registry::EdgeRegistry;
pub use router::{DijkstraRouter, Route, Router};
