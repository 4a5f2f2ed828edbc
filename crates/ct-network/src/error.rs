//! Network-subsystem error type.

use thiserror::Error;

use ct_core::NodeId;

/// Errors produced by `ct-network`.
///
/// `NoRoute` is the only *expected* variant: the agent layer recovers from
/// it by redrawing the destination.  `UnknownNode` indicates a bad
/// identifier crossing the network boundary and is treated as fatal by
/// callers that produce their own node IDs.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("no edge from {from} to {to}")]
    NoEdge { from: NodeId, to: NodeId },

    #[error("network artifact parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
