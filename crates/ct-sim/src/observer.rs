//! Simulation observer trait for progress reporting and data collection.

use ct_core::Tick;
use ct_network::RoadNetwork;

use crate::Agent;

// ── TickReport ────────────────────────────────────────────────────────────────

/// Per-tick outcome counts, handed to observers at every tick boundary.
///
/// The decision-outcome counts let callers distinguish and log the
/// routed / rerouted-after-redraw / idle-no-path cases without any
/// exception-style control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Agents that actually changed node this tick.
    pub moved: usize,
    /// Agents that followed a (fresh or cached) route.
    pub routed: usize,
    /// Agents that had to redraw their destination and routed successfully.
    pub rerouted: usize,
    /// Agents with no usable route even after a redraw.
    pub idle: usize,
    /// Edges above free-flow travel time after the congestion recompute.
    pub congested_edges: usize,
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         println!("{tick}: {} moved, {} congested edges",
///                  report.moved, report.congested_edges);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, after the congestion recompute.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks).  Provides read-only access to the full agent collection and
    /// the network so output writers can record positions and travel times
    /// without the sim knowing about any particular format.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[Agent], _network: &RoadNetwork) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
