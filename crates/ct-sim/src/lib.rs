//! `ct-sim` — tick scheduler and congestion feedback loop.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Decide    — every agent reads the frozen weight snapshot (last
//!                 tick's congestion), recomputes its route if due, and
//!                 requests at most one adjacency step.
//!   ② Move      — all requested moves are applied in bulk against the
//!                 occupancy index; a non-adjacent step is a fatal
//!                 InvalidMove (it signals a routing contract violation).
//!   ③ Congest   — every edge's current travel time is recomputed wholly
//!                 from free-flow time, lanes, and endpoint occupancy
//!                 (parallel with the `parallel` feature).
//! ```
//!
//! Phase ③'s output is the weight snapshot phase ① reads on the next tick —
//! routing decisions shape congestion, congestion reshapes routing.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the congestion recompute on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ct_core::SimConfig;
//! use ct_network::DijkstraRouter;
//! use ct_sim::{AgentKind, NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, 1_000, network, DijkstraRouter)
//!     .kind(AgentKind::CongestionAware)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod agent;
pub mod builder;
pub mod congestion;
pub mod error;
pub mod observer;
pub mod occupancy;
pub mod sim;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentKind, DecisionOutcome};
pub use builder::SimBuilder;
pub use congestion::CongestionModel;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickReport};
pub use occupancy::OccupancyIndex;
pub use sim::{RunState, Sim};
