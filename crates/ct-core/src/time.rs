//! Simulation time model and run configuration.
//!
//! Time is a monotonically increasing `Tick` counter starting at 0.  One tick
//! is one discrete simulation step: agent decisions, bulk movement, then a
//! congestion recompute.  There is no wall-clock mapping — the congestion
//! feedback loop is defined purely in tick space, and all schedule arithmetic
//! on integer ticks is exact (no floating-point drift).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64` to avoid overflow for any conceivable run length.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically assembled by the application crate (agent count and scenario
/// parameters come from external calibration) and passed to `SimBuilder`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Agents recompute their route every N ticks (and whenever their
    /// pending route is empty).  Must be ≥ 1.  Routing is the dominant
    /// per-tick cost, so this interval is the main scalability knob.
    pub recalc_interval_ticks: u64,

    /// Agent capacity contributed by each lane of an edge.  An edge with
    /// `lanes` lanes congests once the combined occupancy of its two
    /// endpoints exceeds `lanes * capacity_per_lane`.
    pub capacity_per_lane: u32,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots;
    /// 1 = every tick.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }
}

impl Default for SimConfig {
    /// Defaults match the reference Pune scenario: 10 ticks, route
    /// recalculation every 5 ticks, 10 agents of capacity per lane.
    fn default() -> Self {
        Self {
            total_ticks:           10,
            seed:                  42,
            recalc_interval_ticks: 5,
            capacity_per_lane:     10,
            output_interval_ticks: 1,
        }
    }
}
