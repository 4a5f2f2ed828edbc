//! closure — what-if run: the expressway is shut down.
//!
//! Applies a motorway closure (falling back to primaries if the network had
//! no motorways at all) and compares the Shivajinagar → Hinjewadi commute
//! against the baseline network, then runs the simulation on the reduced
//! network to show the extra congestion on the remaining roads.

mod network;

use anyhow::Result;

use ct_core::{SimConfig, Tick};
use ct_network::{DijkstraRouter, RoadClass, RoadClosure, Router};
use ct_sim::{SimBuilder, SimObserver, TickReport};

use network::build_network;

const AGENT_COUNT: usize = 40;

struct SummaryPrinter;

impl SimObserver for SummaryPrinter {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        println!(
            "{tick}: {} moved, {} rerouted, {} congested edges",
            report.moved, report.rerouted, report.congested_edges
        );
    }
}

fn main() -> Result<()> {
    println!("=== closure — expressway shutdown what-if ===");

    let (baseline, nodes) = build_network();
    let [shivajinagar, _, hinjewadi, ..] = nodes;

    let router = DijkstraRouter;
    let before = router.route(&baseline, shivajinagar, hinjewadi)?;
    println!(
        "Baseline commute Shivajinagar → Hinjewadi: {} hops, {:.1} min",
        before.len(),
        before.total_ms as f64 / 60_000.0
    );

    let config = SimConfig {
        total_ticks: 10,
        ..SimConfig::default()
    };
    let mut sim = SimBuilder::new(config, AGENT_COUNT, baseline, DijkstraRouter)
        .scenario(RoadClosure::with_fallback(RoadClass::Motorway, RoadClass::Primary))
        .build()?;
    println!("Closed {} directed edges", sim.closed_edges);

    let after = sim.router.route(&sim.network, shivajinagar, hinjewadi)?;
    println!(
        "Post-closure commute: {} hops, {:.1} min",
        after.len(),
        after.total_ms as f64 / 60_000.0
    );
    println!();

    sim.run(&mut SummaryPrinter)?;

    println!();
    println!(
        "Final state: {} of {} edges congested",
        sim.network.congested_edge_count(),
        sim.network.edge_count()
    );
    Ok(())
}
