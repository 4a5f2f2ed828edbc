//! Pre-run scenario transforms ("what-if" network edits).
//!
//! A scenario transform is a one-shot structural edit applied to the network
//! exactly once, before the simulation clock starts.  It is *not* part of
//! the per-tick loop: agents whose eventual routes would have crossed
//! removed edges simply fail their next routing call and fall back to the
//! redraw-destination path in the agent decision protocol.

use crate::network::{RoadClass, RoadNetwork};

/// A one-shot, pre-run edit to the road network.
///
/// Implementations return the number of edges removed so the application
/// can report the scenario's scope.
pub trait ScenarioTransform {
    fn apply(&self, network: &mut RoadNetwork) -> usize;
}

/// Every `&mut RoadNetwork → usize` closure is a scenario transform.
impl<F> ScenarioTransform for F
where
    F: Fn(&mut RoadNetwork) -> usize,
{
    fn apply(&self, network: &mut RoadNetwork) -> usize {
        self(network)
    }
}

// ── RoadClosure ───────────────────────────────────────────────────────────────

/// Close (remove) every edge of a given road class.
///
/// If no edge of `class` exists and a `fallback` class is configured, the
/// fallback class is closed instead — mirroring "close the motorways; if
/// this network has none, close the primaries".
#[derive(Debug, Clone)]
pub struct RoadClosure {
    pub class:    RoadClass,
    pub fallback: Option<RoadClass>,
}

impl RoadClosure {
    pub fn new(class: RoadClass) -> Self {
        Self { class, fallback: None }
    }

    pub fn with_fallback(class: RoadClass, fallback: RoadClass) -> Self {
        Self { class, fallback: Some(fallback) }
    }
}

impl ScenarioTransform for RoadClosure {
    fn apply(&self, network: &mut RoadNetwork) -> usize {
        let target = if network.edge_class.contains(&self.class) {
            self.class
        } else {
            match self.fallback {
                Some(fb) => fb,
                None     => return 0,
            }
        };
        network.retain_edges(|e| e.class != target)
    }
}
