//! `fleet-graph`: navigation graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`graph`]  | `Vertex`, `Lane`, `NavGraph` (CSR + R-tree), `NavGraphBuilder` |
//! | [`router`] | `Router` trait, `Route`, `BfsRouter`                        |
//! | [`loader`] | `load_nav_graph_json`, `load_nav_graph_reader`, `LoadOptions` |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                              |
//!
//! The graph is immutable once built.  Every query takes `&self`, so a
//! single `NavGraph` can be shared by reference (or behind an `Arc`) across
//! any number of concurrent path requests.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the fleet-core ids.     |

pub mod error;
pub mod graph;
pub mod loader;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use graph::{Lane, NavGraph, NavGraphBuilder, Vertex};
pub use loader::{LoadOptions, load_nav_graph_json, load_nav_graph_reader};
pub use router::{BfsRouter, Route, Router};
