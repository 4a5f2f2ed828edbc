//! pune — congestion feedback demo on a synthetic Pune road network.
//!
//! Agents commute between random nodes; per-edge travel times respond to
//! occupancy each tick, and agents reroute around the resulting congestion.
//! The agent count is calibrated from vehicle registration figures scaled
//! by an on-road fraction, the same way the full-city runs are sized.

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use ct_core::{NodeId, SimConfig, Tick};
use ct_network::{DijkstraRouter, RoadNetwork};
use ct_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ct_sim::{Agent, SimBuilder, SimObserver, TickReport};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TOTAL_TICKS:           u64 = 10;
const RECALC_INTERVAL_TICKS: u64 = 5;
const CAPACITY_PER_LANE:     u32 = 10;
const OUTPUT_INTERVAL_TICKS: u64 = 1;

/// Fraction of registered vehicles assumed on the road at once.
const ON_ROAD_FRACTION: f64 = 0.001;

// ── Calibration ───────────────────────────────────────────────────────────────

// Registered vehicles by category (regional transport office yearly totals,
// rounded).  Summed and scaled by ON_ROAD_FRACTION to size the population.
const VEHICLE_REGISTRATIONS_CSV: &str = "\
category,registered\n\
two_wheeler,24800\n\
car,9200\n\
auto_rickshaw,2100\n\
bus,450\n\
goods,1650\n\
";

fn calibrate_agent_count(registrations_csv: &str, fraction: f64) -> Result<usize> {
    let mut rdr = csv::Reader::from_reader(registrations_csv.as_bytes());
    let mut total: u64 = 0;
    for record in rdr.records() {
        let record = record?;
        total += record[1].trim().parse::<u64>()?;
    }
    Ok((total as f64 * fraction) as usize)
}

// ── Observer: per-tick trace of agent 0, forwarding to CSV output ─────────────

struct TracingObserver<W: OutputWriter> {
    inner: SimOutputObserver<W>,
}

impl<W: OutputWriter> SimObserver for TracingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        println!(
            "{tick}: {} moved, {} routed, {} rerouted, {} idle, {} congested edges",
            report.moved, report.routed, report.rerouted, report.idle, report.congested_edges
        );
        self.inner.on_tick_end(tick, report);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent], network: &RoadNetwork) {
        let a0 = &agents[0];
        println!(
            "  agent 0 at node {} ({} hops to node {})",
            a0.node.0,
            a0.route_remaining(),
            a0.destination.0
        );
        self.inner.on_snapshot(tick, agents, network);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== pune — congestion feedback demo ===");

    let agent_count = calibrate_agent_count(VEHICLE_REGISTRATIONS_CSV, ON_ROAD_FRACTION)?;
    println!(
        "Calibrated {agent_count} agents ({} of registered vehicles)",
        ON_ROAD_FRACTION
    );

    let (net, _) = build_network();
    println!("Road network: {} nodes, {} edges", net.node_count(), net.edge_count());

    let config = SimConfig {
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        recalc_interval_ticks: RECALC_INTERVAL_TICKS,
        capacity_per_lane:     CAPACITY_PER_LANE,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };
    println!(
        "Sim: {} ticks, reroute every {} ticks, capacity {} per lane",
        config.total_ticks, config.recalc_interval_ticks, config.capacity_per_lane
    );
    println!();

    let mut sim = SimBuilder::new(config, agent_count, net, DijkstraRouter).build()?;

    std::fs::create_dir_all("output/pune")?;
    let writer = CsvWriter::new(Path::new("output/pune"))?;
    let mut obs = TracingObserver {
        inner: SimOutputObserver::new(writer),
    };

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("Output in output/pune/");
    println!();

    // Final occupancy table.
    println!("{:<8} {:<10} {:<10}", "Node", "Agents", "POI");
    println!("{}", "-".repeat(30));
    for i in 0..sim.network.node_count() {
        let node = NodeId(i as u32);
        println!(
            "{:<8} {:<10} {:<10}",
            node.0,
            sim.occupancy.occupancy(node),
            sim.network.node_poi[i].as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
