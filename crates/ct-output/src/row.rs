//! Plain data row types written by output backends.

/// A snapshot of one agent's position and routing state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    /// The node the agent occupies.  `u32::MAX` means the agent has never
    /// been placed on the network.
    pub node: u32,
    /// The agent's current destination node.
    pub destination: u32,
    /// Hops remaining on the agent's pending route.
    pub route_remaining: u64,
}

/// Per-tick outcome and movement counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:            u64,
    pub moved:           u64,
    pub routed:          u64,
    pub rerouted:        u64,
    pub idle:            u64,
    pub congested_edges: u64,
}
