//! Per-node occupancy index.
//!
//! Maps every node to the set of agents currently located there.  The index
//! is the single source of truth for congestion: the congestion model reads
//! endpoint occupancy from it after all of a tick's moves have been applied.
//!
//! # Invariants
//!
//! - Every live agent appears in exactly one node's set.
//! - The union of all sets is the set of all live agents.
//!
//! Both are maintained by funnelling every position change through
//! [`place`](OccupancyIndex::place) / [`apply_move`](OccupancyIndex::apply_move);
//! nothing reads the index mid-update because moves are applied in one
//! sequential phase.

use rustc_hash::FxHashSet;

use ct_core::{AgentId, NodeId};

/// Node-indexed multiset of agent locations.
#[derive(Debug)]
pub struct OccupancyIndex {
    /// `sets[n]` = agents currently at node `n`.  Indexed by `NodeId`.
    sets: Vec<FxHashSet<AgentId>>,
}

impl OccupancyIndex {
    /// Create an empty index over `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            sets: (0..node_count).map(|_| FxHashSet::default()).collect(),
        }
    }

    /// Number of agents at `node`.
    #[inline]
    pub fn occupancy(&self, node: NodeId) -> usize {
        self.sets[node.index()].len()
    }

    /// The agents at `node`.
    #[inline]
    pub fn agents_at(&self, node: NodeId) -> &FxHashSet<AgentId> {
        &self.sets[node.index()]
    }

    /// Register `agent` at `node` (initial placement only).
    pub fn place(&mut self, agent: AgentId, node: NodeId) {
        let inserted = self.sets[node.index()].insert(agent);
        debug_assert!(inserted, "agent {agent} placed twice");
    }

    /// Move `agent` from `from` to `to`.
    ///
    /// The caller (the scheduler's movement phase) has already validated
    /// adjacency; this only maintains the set invariant.
    pub fn apply_move(&mut self, agent: AgentId, from: NodeId, to: NodeId) {
        let removed = self.sets[from.index()].remove(&agent);
        debug_assert!(removed, "agent {agent} was not at {from}");
        self.sets[to.index()].insert(agent);
    }

    /// Total agents across all nodes.  O(node_count); used by invariant
    /// checks, not by the tick loop.
    pub fn total_agents(&self) -> usize {
        self.sets.iter().map(|s| s.len()).sum()
    }

    pub fn node_count(&self) -> usize {
        self.sets.len()
    }
}
