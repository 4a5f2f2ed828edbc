//! `ct-core` — foundational types for the `citytwin` traffic microsimulation.
//!
//! This crate is a dependency of every other `ct-*` crate.  It intentionally
//! has no `ct-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                  |
//! |-----------|-------------------------------------------|
//! | [`ids`]   | `AgentId`, `NodeId`, `EdgeId`             |
//! | [`geo`]   | `GeoPoint`                                |
//! | [`time`]  | `Tick`, `SimConfig`                       |
//! | [`rng`]   | `SimRng` (single shared random source)    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::GeoPoint;
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::SimRng;
pub use time::{SimConfig, Tick};
