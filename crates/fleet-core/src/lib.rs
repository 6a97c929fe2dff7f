//! `fleet-core`: foundational types for the robot fleet simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VertexId`, `LaneId`, `RobotId`                       |
//! | [`geo`]         | `Point2`, euclidean distance, lerp                    |
//! | [`time`]        | `Tick`                                                |
//! | [`config`]      | `FleetConfig`                                         |
//! | [`rng`]         | `SimRng` (seeded, reproducible)                       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FleetConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Point2;
pub use ids::{LaneId, RobotId, VertexId};
pub use rng::SimRng;
pub use time::Tick;
