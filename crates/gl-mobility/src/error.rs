use gl_core::NodeId;
use gl_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("routing failed: {0}")]
    Routing(#[from] NetworkError),

    #[error("route from {from} to {to} has no edges")]
    EmptyRoute { from: NodeId, to: NodeId },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
