//! CSV loader for the enriched network artifact.
//!
//! The upstream ETL hands the core a ready-made network as two CSV files.
//!
//! # `nodes.csv`
//!
//! ```csv
//! node_id,lat,lon,poi
//! 1803396017,18.5204,73.8567,
//! 1803396020,18.5311,73.8446,hospital
//! ```
//!
//! `node_id` is the ETL's opaque identifier (e.g. an OSM node ID); the
//! loader remaps it to a dense internal [`NodeId`].  `poi` is optional and
//! informational.
//!
//! # `edges.csv`
//!
//! ```csv
//! from_id,to_id,length_m,lanes,free_flow_secs,road_class
//! 1803396017,1803396020,412.6,2,49.5,primary
//! ```
//!
//! Attribute policy (upstream files are messy exports):
//!
//! - `lanes` absent or malformed → defaults to **1**.
//! - `free_flow_secs` absent or non-positive → **hard error**.  The core
//!   does not derive free-flow times from raw tags; a network without them
//!   is rejected outright rather than silently mis-simulated.
//! - `road_class` unknown → `RoadClass::Unclassified`.
//! - An edge endpoint not present in `nodes.csv` → hard error.
//!
//! Rows for the same `(from, to)` pair are all kept — the network is a
//! multigraph and parallel edges are meaningful.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ct_core::{GeoPoint, NodeId};

use crate::network::{RoadClass, RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u64,
    lat:     f32,
    lon:     f32,
    #[serde(default)]
    poi:     Option<String>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from_id:        u64,
    to_id:          u64,
    length_m:       f64,
    #[serde(default)]
    lanes:          String,
    free_flow_secs: f64,
    #[serde(default)]
    road_class:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadNetwork`] from `nodes.csv` and `edges.csv` files.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> NetworkResult<RoadNetwork> {
    let nodes_file = std::fs::File::open(nodes)?;
    let edges_file = std::fs::File::open(edges)?;
    load_network_readers(nodes_file, edges_file)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from streams.
pub fn load_network_readers<N: Read, E: Read>(nodes: N, edges: E) -> NetworkResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut id_map: HashMap<u64, NodeId> = HashMap::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        if id_map.contains_key(&row.node_id) {
            return Err(NetworkError::Parse(format!(
                "duplicate node_id {} in nodes.csv",
                row.node_id
            )));
        }
        let pos = GeoPoint::new(row.lat, row.lon);
        let id = match row.poi.filter(|p| !p.trim().is_empty()) {
            Some(tag) => builder.add_poi_node(pos, tag.trim().to_owned()),
            None      => builder.add_node(pos),
        };
        id_map.insert(row.node_id, id);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;

        let from = resolve(&id_map, row.from_id)?;
        let to   = resolve(&id_map, row.to_id)?;

        if !(row.length_m.is_finite() && row.length_m > 0.0) {
            return Err(NetworkError::Parse(format!(
                "edge {} → {}: length_m must be positive, got {}",
                row.from_id, row.to_id, row.length_m
            )));
        }
        if !(row.free_flow_secs.is_finite() && row.free_flow_secs > 0.0) {
            return Err(NetworkError::Parse(format!(
                "edge {} → {}: free_flow_secs must be positive, got {}",
                row.from_id, row.to_id, row.free_flow_secs
            )));
        }

        builder.add_edge(
            from,
            to,
            row.length_m as f32,
            parse_lanes(&row.lanes),
            RoadClass::parse(&row.road_class),
            (row.free_flow_secs * 1_000.0).round() as u32,
        );
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve(id_map: &HashMap<u64, NodeId>, ext_id: u64) -> NetworkResult<NodeId> {
    id_map.get(&ext_id).copied().ok_or_else(|| {
        NetworkError::Parse(format!("edge references unknown node_id {ext_id}"))
    })
}

/// Lane counts arrive as strings ("2", "2.0", "", "semi;colon;lists", …).
/// Anything that does not parse to a count ≥ 1 defaults to 1.
fn parse_lanes(raw: &str) -> u16 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 1.0 => n as u16,
        _ => 1,
    }
}
