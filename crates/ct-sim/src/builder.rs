//! Fluent construction and validation of a [`Sim`].

use ct_core::{AgentId, NodeId, SimConfig, SimRng};
use ct_network::{RoadNetwork, Router, ScenarioTransform};

use crate::sim::{RunState, Sim};
use crate::{Agent, AgentKind, CongestionModel, OccupancyIndex, SimError, SimResult};

/// Builder for a [`Sim`].
///
/// Collects configuration, the network, the router, and any pre-run
/// scenario transforms, then validates the whole in [`build`][Self::build].
/// Scenario transforms run inside `build`, before the sim exists in its
/// `Ready` state — topology is immutable once the clock can start.
pub struct SimBuilder<R: Router> {
    config:       SimConfig,
    agent_count:  usize,
    kind:         AgentKind,
    network:      RoadNetwork,
    router:       R,
    scenarios:    Vec<Box<dyn ScenarioTransform>>,
    positions:    Option<Vec<NodeId>>,
    destinations: Option<Vec<NodeId>>,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, agent_count: usize, network: RoadNetwork, router: R) -> Self {
        Self {
            config,
            agent_count,
            kind: AgentKind::default(),
            network,
            router,
            scenarios: Vec::new(),
            positions: None,
            destinations: None,
        }
    }

    /// Archetype for every agent (the population is homogeneous).
    pub fn kind(mut self, kind: AgentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Queue a one-shot network transform, applied during `build` in the
    /// order queued.
    pub fn scenario(mut self, transform: impl ScenarioTransform + 'static) -> Self {
        self.scenarios.push(Box::new(transform));
        self
    }

    /// Pin every agent's starting node instead of drawing them randomly.
    /// Length must equal the agent count.
    pub fn initial_positions(mut self, positions: Vec<NodeId>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Pin every agent's initial destination instead of drawing them
    /// randomly.  Length must equal the agent count.
    pub fn destinations(mut self, destinations: Vec<NodeId>) -> Self {
        self.destinations = Some(destinations);
        self
    }

    /// Validate everything and produce a `Ready` sim.
    pub fn build(self) -> SimResult<Sim<R>> {
        let Self {
            config,
            agent_count,
            kind,
            mut network,
            router,
            scenarios,
            positions,
            destinations,
        } = self;

        if config.recalc_interval_ticks == 0 {
            return Err(SimError::Config(
                "recalc_interval_ticks must be at least 1".into(),
            ));
        }
        if config.capacity_per_lane == 0 {
            return Err(SimError::Config(
                "capacity_per_lane must be at least 1".into(),
            ));
        }
        if network.is_empty() {
            return Err(SimError::Config("network has no nodes".into()));
        }

        if let Some(p) = &positions {
            if p.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      p.len(),
                    what:     "initial positions",
                });
            }
        }
        if let Some(d) = &destinations {
            if d.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      d.len(),
                    what:     "destinations",
                });
            }
        }

        let mut closed_edges = 0;
        for transform in &scenarios {
            closed_edges += transform.apply(&mut network);
        }

        let agents = (0..agent_count)
            .map(|i| Agent::new(AgentId(i as u32), kind))
            .collect();
        let occupancy = OccupancyIndex::new(network.node_count());
        let congestion = CongestionModel::new(config.capacity_per_lane);
        let rng = SimRng::new(config.seed);

        Ok(Sim {
            config,
            state: RunState::Ready,
            tick: ct_core::Tick::ZERO,
            network,
            router,
            congestion,
            agents,
            occupancy,
            rng,
            closed_edges,
            initial_positions: positions,
            initial_destinations: destinations,
        })
    }
}
