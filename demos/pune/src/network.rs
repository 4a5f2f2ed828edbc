//! Shared Pune road network definition.
//!
//! An 8-node synthetic network inspired by the geography of Pune, India.
//! Both the `pune` sim and the `closure` what-if run call this.  Travel
//! times assume ~60 km/h on the expressway, ~40 km/h on primaries, and
//! ~25 km/h on the smaller roads.

use ct_core::{GeoPoint, NodeId};
use ct_network::{RoadClass, RoadNetwork, RoadNetworkBuilder};

/// Build the 8-node Pune-inspired road network.
///
/// Returns `(network, [shivajinagar, station, hinjewadi, kothrud, swargate,
/// hadapsar, katraj, viman_nagar])`.
pub fn build_network() -> (RoadNetwork, [NodeId; 8]) {
    let mut b = RoadNetworkBuilder::new();

    let shivajinagar = b.add_poi_node(GeoPoint::new(18.530, 73.847), "district centre");
    let station      = b.add_poi_node(GeoPoint::new(18.528, 73.874), "railway station");
    let hinjewadi    = b.add_poi_node(GeoPoint::new(18.591, 73.738), "IT park");
    let kothrud      = b.add_node(GeoPoint::new(18.507, 73.807));
    let swargate     = b.add_poi_node(GeoPoint::new(18.501, 73.858), "bus terminus");
    let hadapsar     = b.add_node(GeoPoint::new(18.508, 73.926));
    let katraj       = b.add_node(GeoPoint::new(18.448, 73.865));
    let viman_nagar  = b.add_poi_node(GeoPoint::new(18.567, 73.914), "airport");

    // Expressway spine to the IT park, plus the old two-lane road as a
    // parallel alternative between the same pair of junctions.
    b.add_two_way(shivajinagar, hinjewadi, 14_000.0, 3, RoadClass::Motorway,    840_000);
    b.add_two_way(shivajinagar, hinjewadi, 16_500.0, 2, RoadClass::Primary,   1_485_000);

    // Primary ring.
    b.add_two_way(shivajinagar, station,     2_900.0, 2, RoadClass::Primary,    261_000);
    b.add_two_way(shivajinagar, swargate,    3_400.0, 2, RoadClass::Primary,    306_000);
    b.add_two_way(station,      viman_nagar, 4_600.0, 2, RoadClass::Primary,    414_000);
    b.add_two_way(swargate,     hadapsar,    7_200.0, 2, RoadClass::Primary,    648_000);
    b.add_two_way(swargate,     katraj,      6_100.0, 2, RoadClass::Primary,    549_000);

    // Secondary and smaller connectors.
    b.add_two_way(shivajinagar, kothrud,     4_800.0, 2, RoadClass::Secondary,   691_000);
    b.add_two_way(kothrud,      katraj,      8_300.0, 1, RoadClass::Tertiary,  1_195_000);
    b.add_two_way(hadapsar,     viman_nagar, 6_400.0, 1, RoadClass::Secondary,   922_000);
    b.add_two_way(station,      swargate,    3_300.0, 1, RoadClass::Residential, 475_000);

    let net = b.build();
    (
        net,
        [
            shivajinagar,
            station,
            hinjewadi,
            kothrud,
            swargate,
            hadapsar,
            katraj,
            viman_nagar,
        ],
    )
}
