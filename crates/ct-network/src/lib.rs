//! `ct-network` — road network multigraph, routing, and scenario transforms.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR multigraph), `RoadNetworkBuilder`, `RoadClass` |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`scenario`] | `ScenarioTransform` trait, `RoadClosure`                  |
//! | [`loader`]   | CSV loader for the enriched network artifact              |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                        |
//!
//! The network's topology is immutable once the simulation clock starts;
//! the only mutable attribute is each edge's current travel time, which the
//! congestion model overwrites every tick.  Structural edits (road closures)
//! happen exactly once, pre-run, through [`ScenarioTransform`].

pub mod error;
pub mod loader;
pub mod network;
pub mod router;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_readers};
pub use network::{EdgeView, RoadClass, RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router};
pub use scenario::{RoadClosure, ScenarioTransform};
