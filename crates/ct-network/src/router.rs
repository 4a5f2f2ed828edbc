//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `ct-sim` calls routing via the [`Router`] trait, so applications can swap
//! in custom implementations (contraction hierarchies, A*) without touching
//! the scheduler.  The default [`DijkstraRouter`] is sufficient at city
//! scale: O((V+E) log V) per query, invoked once per agent per recompute.
//!
//! # Weight snapshot
//!
//! Every query reads `edge_travel_ms` — the *current*, congestion-adjusted
//! travel time — at call time.  Nothing is cached across ticks: the whole
//! point of the feedback loop is that this tick's routes see last tick's
//! congestion.
//!
//! # Cost units
//!
//! All costs and totals are in **milliseconds** (u32).  Integer costs keep
//! heap ordering exact and tie-breaking deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ct_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::NetworkError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the ordered node sequence still to visit
/// (source **excluded** — the agent is already there; target **included**)
/// and the total travel time under the weight snapshot at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Nodes to visit in order.  Each consecutive pair is connected by at
    /// least one edge, so popping the front is always a valid adjacency step.
    pub nodes: Vec<NodeId>,
    /// Cumulative travel time in milliseconds over the chosen edges.
    pub total_ms: u32,
}

impl Route {
    /// `true` if the source and target were the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of node hops remaining.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: the decision phase is read-only
/// over the network and may be distributed across worker threads.
pub trait Router: Send + Sync {
    /// Compute a minimum-travel-time route from `from` to `to` over the
    /// network's current weight snapshot.
    ///
    /// `from == to` yields an empty (trivial) route rather than an error.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UnknownNode`] for a missing endpoint;
    /// [`NetworkError::NoRoute`] if `to` is unreachable from `from`.
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId)
        -> Result<Route, NetworkError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, using
/// `edge_travel_ms` as cost.
///
/// Tie-breaking between equal-cost paths is fixed by the heap's secondary
/// `NodeId` key: for a given graph and weight snapshot the result is fully
/// deterministic, with no dependence on hash iteration order.
#[derive(Debug)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<Route, NetworkError> {
        network.check_node(from)?;
        network.check_node(to)?;
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<Route, NetworkError> {
    if from == to {
        return Ok(Route { nodes: vec![], total_ms: 0 });
    }

    let n = network.node_count();
    // dist[v] = best known cost (ms) to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, prev_edge, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(network.edge_travel_ms[edge.index()]);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

/// Trace `prev_edge` back from `to`, producing the node sequence after the
/// source.  Each node appears at most once (Dijkstra's settled-node
/// invariant), so the route is a simple path.
fn reconstruct(network: &RoadNetwork, prev_edge: Vec<EdgeId>, to: NodeId, total_ms: u32) -> Route {
    let mut nodes = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        nodes.push(cur);
        cur = network.edge_from[e.index()];
    }
    nodes.reverse();
    Route { nodes, total_ms }
}
