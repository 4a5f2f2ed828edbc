//! The `Sim` struct and its tick loop.

use ct_core::{AgentId, NodeId, SimConfig, SimRng, Tick};
use ct_network::{RoadNetwork, Router};

use crate::observer::{SimObserver, TickReport};
use crate::{agent, Agent, CongestionModel, DecisionOutcome, OccupancyIndex, SimError, SimResult};

// ── RunState ──────────────────────────────────────────────────────────────────

/// Scheduler lifecycle: `Ready → Running → Finished`.
///
/// `Ready → Running` happens on the first `run`/`run_ticks` call and
/// performs initial agent placement.  A `Finished` sim is inert: further
/// `run` calls return `Ok` without touching any state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunState {
    Ready,
    Running,
    Finished,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation context: network, agents, occupancy, clock, and the one
/// shared random source.
///
/// All state is held here explicitly (no ambient globals), so several
/// independent sims — e.g. parallel what-if scenarios — can coexist in one
/// process.  Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim<R: Router> {
    /// Global configuration (total ticks, seed, recompute interval, …).
    pub config: SimConfig,

    /// Scheduler lifecycle state.
    pub state: RunState,

    /// The current tick.  Starts at 0; advanced after each completed tick.
    pub tick: Tick,

    /// The road network.  Topology is fixed once the clock starts; the
    /// congestion model rewrites `edge_travel_ms` each tick.
    pub network: RoadNetwork,

    /// The routing algorithm used by agent decisions.
    pub router: R,

    /// Occupancy → travel-time mapping applied in phase ③.
    pub congestion: CongestionModel,

    /// All vehicle agents, indexed by `AgentId`.
    pub agents: Vec<Agent>,

    /// Per-node agent sets, mutated only in the movement phase.
    pub occupancy: OccupancyIndex,

    /// The single shared random source (placement, destination draws).
    pub rng: SimRng,

    /// Edges removed by the pre-run scenario transform, for reporting.
    pub closed_edges: usize,

    /// Optional placement overrides, consumed by `start`.
    pub(crate) initial_positions:    Option<Vec<NodeId>>,
    pub(crate) initial_destinations: Option<Vec<NodeId>>,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.total_ticks`, then transition
    /// to `Finished`.  Starts the sim (initial placement) if still `Ready`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.run_ticks(self.config.total_ticks, observer)
    }

    /// Run at most `n` ticks from the current position, stopping early at
    /// `config.total_ticks`.  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        if self.state == RunState::Finished {
            return Ok(());
        }
        self.start()?;

        for _ in 0..n {
            if self.tick >= self.config.end_tick() {
                break;
            }
            self.process_tick(observer)?;
        }

        if self.tick >= self.config.end_tick() {
            self.state = RunState::Finished;
            observer.on_sim_end(self.tick);
        }
        Ok(())
    }

    /// `Ready → Running`: place every agent and draw initial destinations.
    ///
    /// Positions are drawn with replacement from all nodes; a drawn node
    /// with no outgoing edges is re-drawn (an agent must be able to leave
    /// its spawn point).  Explicit overrides from the builder skip the
    /// draw but are still validated.
    ///
    /// Idempotent: does nothing unless the sim is `Ready`.
    pub fn start(&mut self) -> SimResult<()> {
        if self.state != RunState::Ready {
            return Ok(());
        }

        let positions = match self.initial_positions.take() {
            Some(positions) => {
                for &node in &positions {
                    self.network.check_node(node).map_err(SimError::Network)?;
                }
                positions
            }
            None => self.draw_positions()?,
        };

        let destinations = match self.initial_destinations.take() {
            Some(destinations) => {
                for &node in &destinations {
                    self.network.check_node(node).map_err(SimError::Network)?;
                }
                destinations
            }
            None => {
                let n = self.network.node_count() as u32;
                (0..self.agents.len())
                    .map(|_| NodeId(self.rng.gen_range(0..n)))
                    .collect()
            }
        };

        for (agent, (node, destination)) in self
            .agents
            .iter_mut()
            .zip(positions.into_iter().zip(destinations))
        {
            agent.node = node;
            agent.destination = destination;
            self.occupancy.place(agent.id, node);
        }

        self.state = RunState::Running;
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.tick;
        observer.on_tick_start(now);
        let mut report = TickReport::default();

        // ── Phase ①: decisions over the frozen weight snapshot ────────────
        //
        // No agent move or weight write happens before every agent has
        // decided, so all decisions in a tick see the travel times produced
        // by the previous tick's congestion recompute.
        let mut moves: Vec<(AgentId, NodeId)> = Vec::with_capacity(self.agents.len());
        {
            // Explicit field borrows so the borrow checker sees disjoint access.
            let network  = &self.network;
            let router   = &self.router;
            let rng      = &mut self.rng;
            let interval = self.config.recalc_interval_ticks;

            for a in self.agents.iter_mut() {
                let (outcome, step) = agent::decide(a, now, interval, network, router, rng);
                match outcome {
                    DecisionOutcome::Routed   => report.routed += 1,
                    DecisionOutcome::Rerouted => report.rerouted += 1,
                    DecisionOutcome::Idle     => report.idle += 1,
                }
                if let Some(new_pos) = step {
                    moves.push((a.id, new_pos));
                }
            }
        }

        // ── Phase ②: bulk movement ────────────────────────────────────────
        //
        // Applied in one pass before congestion reads occupancy.  The
        // resulting index is order-independent (set semantics), so any
        // application order yields the same state.
        for (agent_id, new_pos) in moves {
            let a = &mut self.agents[agent_id.index()];
            if !self.network.is_adjacent(a.node, new_pos) {
                return Err(SimError::InvalidMove {
                    agent: agent_id,
                    from:  a.node,
                    to:    new_pos,
                });
            }
            self.occupancy.apply_move(agent_id, a.node, new_pos);
            a.node = new_pos;
            report.moved += 1;
        }

        // ── Phase ③: congestion recompute ─────────────────────────────────
        report.congested_edges = self.congestion.recompute(&mut self.network, &self.occupancy);

        self.tick = now + 1;
        observer.on_tick_end(now, &report);
        if self.config.output_interval_ticks > 0 && now.0 % self.config.output_interval_ticks == 0 {
            observer.on_snapshot(now, &self.agents, &self.network);
        }
        Ok(())
    }

    // ── Placement ─────────────────────────────────────────────────────────

    fn draw_positions(&mut self) -> SimResult<Vec<NodeId>> {
        let n = self.network.node_count() as u32;
        let any_connected = (0..n).any(|i| self.network.out_degree(NodeId(i)) > 0);
        if !any_connected {
            return Err(SimError::Config(
                "network has no node with outgoing edges; cannot place agents".into(),
            ));
        }

        Ok((0..self.agents.len())
            .map(|_| loop {
                let node = NodeId(self.rng.gen_range(0..n));
                if self.network.out_degree(node) > 0 {
                    break node;
                }
            })
            .collect())
    }
}
