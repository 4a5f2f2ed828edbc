use ct_core::{AgentId, NodeId};
use ct_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    /// A requested move was not an adjacency step.  The router never emits
    /// non-adjacent steps, so this indicates a logic bug and aborts the run
    /// rather than being silently ignored.
    #[error("agent {agent} requested invalid move {from} → {to}")]
    InvalidMove {
        agent: AgentId,
        from:  NodeId,
        to:    NodeId,
    },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type SimResult<T> = Result<T, SimError>;
