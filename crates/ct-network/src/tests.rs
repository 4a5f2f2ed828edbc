//! Unit tests for ct-network.

use std::io::Cursor;

use ct_core::{GeoPoint, NodeId};

use crate::{
    load_network_readers, DijkstraRouter, NetworkError, RoadClass, RoadClosure, RoadNetwork,
    RoadNetworkBuilder, Router, ScenarioTransform,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(i: u32) -> GeoPoint {
    GeoPoint::new(18.5 + i as f32 * 0.01, 73.8)
}

/// Diamond: 0 → 1 → 3 (cost 1000 + 1000) and 0 → 2 → 3 (cost 500 + 2000).
fn diamond() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let n0 = b.add_node(p(0));
    let n1 = b.add_node(p(1));
    let n2 = b.add_node(p(2));
    let n3 = b.add_node(p(3));
    b.add_edge(n0, n1, 100.0, 1, RoadClass::Residential, 1_000);
    b.add_edge(n1, n3, 100.0, 1, RoadClass::Residential, 1_000);
    b.add_edge(n0, n2, 100.0, 1, RoadClass::Residential, 500);
    b.add_edge(n2, n3, 100.0, 1, RoadClass::Residential, 2_000);
    b.build()
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use super::*;

    #[test]
    fn csr_layout_groups_out_edges_by_source() {
        let net = diamond();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 4);
        assert_eq!(net.out_degree(NodeId(0)), 2);
        assert_eq!(net.out_degree(NodeId(3)), 0);
        for e in net.out_edges(NodeId(0)) {
            assert_eq!(net.edge_from[e.index()], NodeId(0));
        }
    }

    #[test]
    fn parallel_edges_are_distinct_and_weight_takes_min() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(p(0));
        let c = b.add_node(p(1));
        // Two parallel carriageways with different travel times.
        b.add_edge(a, c, 300.0, 1, RoadClass::Primary, 3_000);
        b.add_edge(a, c, 280.0, 2, RoadClass::Motorway, 1_500);
        let net = b.build();

        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.edge_weight_ms(a, c).unwrap(), 1_500);
    }

    #[test]
    fn edge_weight_reads_current_travel_time() {
        let mut net = diamond();
        assert_eq!(net.edge_weight_ms(NodeId(0), NodeId(1)).unwrap(), 1_000);
        // Congest the edge; the weight must follow.
        net.edge_travel_ms[0] = 4_000;
        let w = net.edge_weight_ms(net.edge_from[0], net.edge_to[0]).unwrap();
        assert_eq!(w, 4_000);
    }

    #[test]
    fn unknown_node_errors() {
        let net = diamond();
        assert!(matches!(
            net.neighbors(NodeId(99)).map(|_| ()),
            Err(NetworkError::UnknownNode(NodeId(99)))
        ));
        assert!(matches!(
            net.edge_weight_ms(NodeId(0), NodeId(99)),
            Err(NetworkError::UnknownNode(_))
        ));
    }

    #[test]
    fn no_edge_between_unconnected_pair() {
        let net = diamond();
        assert!(matches!(
            net.edge_weight_ms(NodeId(1), NodeId(2)),
            Err(NetworkError::NoEdge { .. })
        ));
    }

    #[test]
    fn neighbors_and_adjacency() {
        let net = diamond();
        let heads: Vec<NodeId> = net.neighbors(NodeId(0)).unwrap().collect();
        assert_eq!(heads.len(), 2);
        assert!(heads.contains(&NodeId(1)) && heads.contains(&NodeId(2)));
        assert!(net.is_adjacent(NodeId(0), NodeId(1)));
        assert!(!net.is_adjacent(NodeId(1), NodeId(0))); // directed
    }

    #[test]
    fn retain_edges_rebuilds_csr() {
        let mut net = diamond();
        let removed = net.retain_edges(|e| !(e.from == NodeId(0) && e.to == NodeId(1)));
        assert_eq!(removed, 1);
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.out_degree(NodeId(0)), 1);
        assert!(!net.is_adjacent(NodeId(0), NodeId(1)));
        // CSR row pointer still consistent.
        assert_eq!(*net.node_out_start.last().unwrap() as usize, net.edge_count());
    }

    #[test]
    fn congested_edge_count_tracks_travel_above_free_flow() {
        let mut net = diamond();
        assert_eq!(net.congested_edge_count(), 0);
        net.edge_travel_ms[2] = net.edge_free_flow_ms[2] * 3;
        assert_eq!(net.congested_edge_count(), 1);
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::*;

    #[test]
    fn picks_minimum_cost_path() {
        let net = diamond();
        let route = DijkstraRouter.route(&net, NodeId(0), NodeId(3)).unwrap();
        // 0→1→3 costs 2000; 0→2→3 costs 2500.
        assert_eq!(route.nodes, vec![NodeId(1), NodeId(3)]);
        assert_eq!(route.total_ms, 2_000);
    }

    #[test]
    fn excludes_source_includes_target() {
        let net = diamond();
        let route = DijkstraRouter.route(&net, NodeId(0), NodeId(1)).unwrap();
        assert_eq!(route.nodes, vec![NodeId(1)]);
    }

    #[test]
    fn route_is_a_simple_path() {
        let net = diamond();
        let route = DijkstraRouter.route(&net, NodeId(0), NodeId(3)).unwrap();
        let mut seen = route.nodes.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), route.nodes.len());
        assert!(!route.nodes.contains(&NodeId(0)));
    }

    #[test]
    fn trivial_route_when_source_equals_target() {
        let net = diamond();
        let route = DijkstraRouter.route(&net, NodeId(2), NodeId(2)).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.total_ms, 0);
    }

    #[test]
    fn unreachable_target_is_no_route() {
        let net = diamond(); // all edges point away from node 3
        assert!(matches!(
            DijkstraRouter.route(&net, NodeId(3), NodeId(0)),
            Err(NetworkError::NoRoute { from: NodeId(3), to: NodeId(0) })
        ));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let net = diamond();
        assert!(matches!(
            DijkstraRouter.route(&net, NodeId(0), NodeId(42)),
            Err(NetworkError::UnknownNode(NodeId(42)))
        ));
    }

    #[test]
    fn rerouting_follows_congested_weights() {
        let mut net = diamond();
        // Congest 0→1 so the 0→2→3 branch becomes cheaper.
        net.edge_travel_ms[0] = 10_000;
        let route = DijkstraRouter.route(&net, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(route.nodes, vec![NodeId(2), NodeId(3)]);
        assert_eq!(route.total_ms, 2_500);
    }

    #[test]
    fn equal_cost_paths_resolve_deterministically() {
        // Two node-disjoint paths of identical cost: 0→1→3 and 0→2→3.
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(p(0));
        let n1 = b.add_node(p(1));
        let n2 = b.add_node(p(2));
        let n3 = b.add_node(p(3));
        for (u, v) in [(n0, n1), (n1, n3), (n0, n2), (n2, n3)] {
            b.add_edge(u, v, 100.0, 1, RoadClass::Residential, 1_000);
        }
        let net = b.build();
        let first = DijkstraRouter.route(&net, n0, n3).unwrap();
        for _ in 0..10 {
            assert_eq!(DijkstraRouter.route(&net, n0, n3).unwrap(), first);
        }
    }
}

// ── ScenarioTransform ─────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;

    fn classed_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(p(0));
        let n1 = b.add_node(p(1));
        let n2 = b.add_node(p(2));
        b.add_two_way(n0, n1, 500.0, 3, RoadClass::Motorway, 30_000);
        b.add_two_way(n1, n2, 400.0, 2, RoadClass::Primary, 40_000);
        b.add_two_way(n0, n2, 900.0, 1, RoadClass::Residential, 90_000);
        b.build()
    }

    #[test]
    fn closes_all_edges_of_class() {
        let mut net = classed_network();
        let removed = RoadClosure::new(RoadClass::Motorway).apply(&mut net);
        assert_eq!(removed, 2);
        assert!(!net.is_adjacent(NodeId(0), NodeId(1)));
        assert!(net.is_adjacent(NodeId(1), NodeId(2)));
    }

    #[test]
    fn falls_back_when_class_absent() {
        let mut net = classed_network();
        RoadClosure::new(RoadClass::Motorway).apply(&mut net);
        // No motorways remain; a second closure falls back to primaries.
        let removed =
            RoadClosure::with_fallback(RoadClass::Motorway, RoadClass::Primary).apply(&mut net);
        assert_eq!(removed, 2);
        assert!(!net.is_adjacent(NodeId(1), NodeId(2)));
    }

    #[test]
    fn no_match_and_no_fallback_removes_nothing() {
        let mut net = classed_network();
        let removed = RoadClosure::new(RoadClass::Trunk).apply(&mut net);
        assert_eq!(removed, 0);
        assert_eq!(net.edge_count(), 6);
    }

    #[test]
    fn closures_are_transforms_too() {
        let mut net = classed_network();
        let drop_everything = |net: &mut RoadNetwork| net.retain_edges(|_| false);
        let removed = ScenarioTransform::apply(&drop_everything, &mut net);
        assert_eq!(removed, 6);
        assert_eq!(net.edge_count(), 0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const NODES: &str = "\
node_id,lat,lon,poi
100,18.5204,73.8567,
200,18.5311,73.8446,hospital
300,18.5100,73.8600,
";

    const EDGES: &str = "\
from_id,to_id,length_m,lanes,free_flow_secs,road_class
100,200,412.6,2,49.5,primary
200,100,412.6,2,49.5,primary
200,300,880.0,,105.6,residential
";

    #[test]
    fn loads_nodes_and_edges() {
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.node_poi[1].as_deref(), Some("hospital"));
        assert_eq!(net.node_poi[0], None);
        // 49.5 s → 49 500 ms; travel time starts at free flow.
        let w = net.edge_weight_ms(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(w, 49_500);
        assert_eq!(net.edge_class[0], RoadClass::Primary);
    }

    #[test]
    fn missing_lanes_defaults_to_one() {
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        // The 200→300 edge has an empty lanes field.
        let e = net.out_edges(NodeId(1))
            .find(|e| net.edge_to[e.index()] == NodeId(2))
            .unwrap();
        assert_eq!(net.edge_lanes[e.index()], 1);
    }

    #[test]
    fn malformed_lanes_defaults_to_one() {
        let edges = "\
from_id,to_id,length_m,lanes,free_flow_secs,road_class
100,200,412.6,two;3,49.5,primary
";
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        assert_eq!(net.edge_lanes[0], 1);
    }

    #[test]
    fn float_lanes_are_truncated() {
        let edges = "\
from_id,to_id,length_m,lanes,free_flow_secs,road_class
100,200,412.6,2.0,49.5,primary
";
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        assert_eq!(net.edge_lanes[0], 2);
    }

    #[test]
    fn non_positive_free_flow_is_rejected() {
        let edges = "\
from_id,to_id,length_m,lanes,free_flow_secs,road_class
100,200,412.6,2,0.0,primary
";
        let result = load_network_readers(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(NetworkError::Parse(_))));
    }

    #[test]
    fn unknown_edge_endpoint_is_rejected() {
        let edges = "\
from_id,to_id,length_m,lanes,free_flow_secs,road_class
100,999,412.6,2,49.5,primary
";
        let result = load_network_readers(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(NetworkError::Parse(_))));
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let nodes = "\
node_id,lat,lon,poi
100,18.52,73.85,
100,18.53,73.86,
";
        let edges = "from_id,to_id,length_m,lanes,free_flow_secs,road_class\n";
        let result = load_network_readers(Cursor::new(nodes), Cursor::new(edges));
        assert!(matches!(result, Err(NetworkError::Parse(_))));
    }

    #[test]
    fn unknown_road_class_is_unclassified() {
        assert_eq!(RoadClass::parse("motorway"), RoadClass::Motorway);
        assert_eq!(RoadClass::parse("living_street"), RoadClass::Unclassified);
        assert_eq!(RoadClass::parse(""), RoadClass::Unclassified);
    }
}
