//! Network-subsystem error type.
//!
//! Everything except `NoRoute` is a fatal initialization error: the network
//! cannot be built, so the simulation cannot start.

use thiserror::Error;

use gl_core::{NodeId, RoadId};

/// Errors produced by `gl-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("road feature {feature} has no `{field}` attribute")]
    MissingAttribute { field: String, feature: usize },

    #[error("road feature {feature} has non-integer `{field}` value {value:?}")]
    InvalidAttribute {
        field:   String,
        feature: usize,
        value:   String,
    },

    #[error("road identifier {0} appears on more than one edge")]
    DuplicateRoadId(RoadId),

    #[error("road feature {feature} has unsupported geometry: {reason}")]
    UnsupportedGeometry { feature: usize, reason: String },

    #[error("road {0} is not in the edge registry")]
    UnknownRoad(RoadId),

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "shapefile")]
    #[error("shapefile error in {path}: {message}")]
    Shapefile { path: String, message: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
