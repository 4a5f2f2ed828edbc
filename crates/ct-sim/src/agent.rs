//! Vehicle agents and the per-tick decision protocol.
//!
//! An agent is a plain data record; behavior lives in the free function
//! [`decide`], dispatched over the closed [`AgentKind`] set.  Two archetypes
//! exist: the congestion-aware router and the naive random walker.  No
//! trait objects — a direct `match` suffices for two variants.

use std::collections::VecDeque;

use ct_core::{AgentId, NodeId, SimRng, Tick};
use ct_network::{RoadNetwork, Router};

// ── AgentKind ─────────────────────────────────────────────────────────────────

/// The closed set of agent archetypes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum AgentKind {
    /// Routes to a destination by minimum current travel time, rerouting
    /// around congestion every recompute.
    #[default]
    CongestionAware,
    /// Hops to a uniformly random neighbor each tick.  Useful as a
    /// null-model baseline against the congestion-aware archetype.
    RandomWalk,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One vehicle agent.
///
/// Created once at simulation start and destroyed only at simulation end.
/// An agent mutates only its own fields; position changes go through the
/// scheduler's move application so the occupancy index stays consistent.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id:   AgentId,
    pub kind: AgentKind,

    /// Current node.  `NodeId::INVALID` only before initial placement.
    pub node: NodeId,

    /// Current destination; redrawn whenever reached or unreachable.
    pub destination: NodeId,

    /// Ordered nodes still to visit, current node excluded.  The front is
    /// always adjacent to `node`.
    pub route: VecDeque<NodeId>,

    /// Tick of the last successful route recompute.
    pub last_recompute: Tick,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind) -> Self {
        Self {
            id,
            kind,
            node:           NodeId::INVALID,
            destination:    NodeId::INVALID,
            route:          VecDeque::new(),
            last_recompute: Tick::ZERO,
        }
    }

    /// Remaining hops on the pending route.
    #[inline]
    pub fn route_remaining(&self) -> usize {
        self.route.len()
    }
}

// ── DecisionOutcome ───────────────────────────────────────────────────────────

/// What happened in one agent's decision phase.
///
/// An explicit result instead of exception-style control flow: callers can
/// count and log each case per tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecisionOutcome {
    /// The agent has a usable route (fresh or cached) and requested a step.
    Routed,
    /// The original destination was unreachable (or already reached); a new
    /// destination was drawn and routed successfully.
    Rerouted,
    /// No usable route even after one destination redraw; the agent stays
    /// put this tick.  A valid steady state, not an error.
    Idle,
}

// ── Decision protocol ─────────────────────────────────────────────────────────

/// Run one agent's decision phase and return the outcome plus the requested
/// adjacency step, if any.
///
/// Reads only the frozen weight snapshot (the network is untouched until
/// the congestion phase), so all agents in a tick decide against the same
/// travel times.  RNG draws happen here, under the scheduler's sequential
/// iteration order, keeping runs reproducible.
///
/// The destination redraw is attempted **at most once per tick** so a fully
/// partitioned graph degrades to idling agents instead of a retry loop.
pub fn decide<R: Router>(
    agent:           &mut Agent,
    now:             Tick,
    recalc_interval: u64,
    network:         &RoadNetwork,
    router:          &R,
    rng:             &mut SimRng,
) -> (DecisionOutcome, Option<NodeId>) {
    match agent.kind {
        AgentKind::CongestionAware => {
            decide_congestion_aware(agent, now, recalc_interval, network, router, rng)
        }
        AgentKind::RandomWalk => decide_random_walk(agent, network, rng),
    }
}

fn decide_congestion_aware<R: Router>(
    agent:           &mut Agent,
    now:             Tick,
    recalc_interval: u64,
    network:         &RoadNetwork,
    router:          &R,
    rng:             &mut SimRng,
) -> (DecisionOutcome, Option<NodeId>) {
    let mut outcome = DecisionOutcome::Routed;

    if now.0 % recalc_interval == 0 || agent.route.is_empty() {
        if !recompute_route(agent, now, network, router) {
            // Destination unreachable or already reached: one redraw, one retry.
            agent.destination = draw_destination(network, rng);
            if recompute_route(agent, now, network, router) {
                outcome = DecisionOutcome::Rerouted;
            } else {
                agent.route.clear();
                return (DecisionOutcome::Idle, None);
            }
        }
    }

    match agent.route.pop_front() {
        Some(new_pos) => (outcome, Some(new_pos)),
        None          => (DecisionOutcome::Idle, None),
    }
}

fn decide_random_walk(
    agent:   &mut Agent,
    network: &RoadNetwork,
    rng:     &mut SimRng,
) -> (DecisionOutcome, Option<NodeId>) {
    let degree = network.out_degree(agent.node);
    if degree == 0 {
        return (DecisionOutcome::Idle, None);
    }
    // Out-edges are a contiguous CSR range; index the picked one directly.
    let pick = rng.gen_range(0..degree);
    let first = network.node_out_start[agent.node.index()] as usize;
    (DecisionOutcome::Routed, Some(network.edge_to[first + pick]))
}

/// Recompute `agent.route` toward its current destination over the current
/// weight snapshot.  Returns `false` — leaving the route untouched — when no
/// usable (non-trivial) route exists.
fn recompute_route<R: Router>(
    agent:   &mut Agent,
    now:     Tick,
    network: &RoadNetwork,
    router:  &R,
) -> bool {
    match router.route(network, agent.node, agent.destination) {
        Ok(route) if !route.is_trivial() => {
            agent.route = route.nodes.into();
            agent.last_recompute = now;
            true
        }
        // Trivial route (destination == position), no path, or a stale
        // destination id: all answered the same way, by a redraw upstream.
        Ok(_) | Err(_) => false,
    }
}

/// Draw a destination uniformly from all nodes (isolated ones included —
/// an unreachable draw is handled by the next redraw).
#[inline]
fn draw_destination(network: &RoadNetwork, rng: &mut SimRng) -> NodeId {
    NodeId(rng.gen_range(0..network.node_count() as u32))
}
