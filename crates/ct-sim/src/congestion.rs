//! The congestion model: occupancy → per-edge travel time.
//!
//! For every edge `(u, v)` with `lanes` lanes:
//!
//! ```text
//! load     = occupancy(u) + occupancy(v)
//! capacity = lanes * capacity_per_lane
//! current  = if load > capacity { free_flow * load / capacity }
//!            else               { free_flow }
//! ```
//!
//! The recompute is **stateless**: every edge's travel time is overwritten
//! from its free-flow time and the instantaneous occupancy of its endpoints,
//! never incrementally adjusted, so long runs cannot accumulate drift.  An
//! edge dropping back under capacity resets abruptly to free flow — there is
//! no hysteresis or decay.  The penalty is linear and unbounded above.
//!
//! Each edge's pass reads only the frozen occupancy index and writes only
//! its own slot of `edge_travel_ms`, so the loop is data-parallel; the
//! `parallel` feature runs it on Rayon's thread pool.

use ct_network::RoadNetwork;

use crate::OccupancyIndex;

/// Maps occupancy and lane capacity to current edge travel times.
#[derive(Copy, Clone, Debug)]
pub struct CongestionModel {
    /// Agent capacity contributed by each lane (≥ 1, validated at build).
    pub capacity_per_lane: u32,
}

impl CongestionModel {
    pub fn new(capacity_per_lane: u32) -> Self {
        Self { capacity_per_lane }
    }

    /// Travel time for one edge under `load` agents.
    #[inline]
    fn edge_travel_ms(&self, free_flow_ms: u32, lanes: u16, load: u32) -> u32 {
        let capacity = lanes as u32 * self.capacity_per_lane;
        if load > capacity {
            (free_flow_ms as f64 * load as f64 / capacity as f64).round() as u32
        } else {
            free_flow_ms
        }
    }

    /// Recompute every edge's `edge_travel_ms` from the occupancy index.
    /// Returns the number of edges now above free flow.
    ///
    /// Must only run after all of the tick's moves are applied: it assumes
    /// the occupancy index is frozen for the duration of the pass.
    pub fn recompute(&self, network: &mut RoadNetwork, occupancy: &OccupancyIndex) -> usize {
        let RoadNetwork {
            edge_from,
            edge_to,
            edge_lanes,
            edge_free_flow_ms,
            edge_travel_ms,
            ..
        } = network;

        #[cfg(not(feature = "parallel"))]
        {
            let mut congested = 0;
            for i in 0..edge_travel_ms.len() {
                let load = (occupancy.occupancy(edge_from[i])
                    + occupancy.occupancy(edge_to[i])) as u32;
                let travel = self.edge_travel_ms(edge_free_flow_ms[i], edge_lanes[i], load);
                edge_travel_ms[i] = travel;
                if travel > edge_free_flow_ms[i] {
                    congested += 1;
                }
            }
            congested
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let edge_from:         &[_] = edge_from;
            let edge_to:           &[_] = edge_to;
            let edge_lanes:        &[_] = edge_lanes;
            let edge_free_flow_ms: &[_] = edge_free_flow_ms;

            edge_travel_ms
                .par_iter_mut()
                .enumerate()
                .map(|(i, travel)| {
                    let load = (occupancy.occupancy(edge_from[i])
                        + occupancy.occupancy(edge_to[i])) as u32;
                    *travel = self.edge_travel_ms(edge_free_flow_ms[i], edge_lanes[i], load);
                    usize::from(*travel > edge_free_flow_ms[i])
                })
                .sum()
        }
    }
}
