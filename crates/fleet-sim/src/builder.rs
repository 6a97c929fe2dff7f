//! Fluent builder for constructing a [`Fleet`].

use std::sync::Arc;

use fleet_core::{FleetConfig, VertexId};
use fleet_graph::{NavGraph, Router};

use crate::{Fleet, FleetResult};

/// Fluent builder for [`Fleet<R>`].
///
/// # Required inputs
///
/// - the [`NavGraph`], owned or already behind an `Arc`
/// - `R: Router` (e.g. [`fleet_graph::BfsRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                  |
/// |-------------------------|--------------------------|
/// | `.config(c)`            | `FleetConfig::default()` |
/// | `.initial_positions(v)` | no robots                |
///
/// # Example
///
/// ```rust,ignore
/// let mut fleet = FleetBuilder::new(graph, BfsRouter)
///     .config(config)
///     .initial_positions(vec![VertexId(0), VertexId(4)])
///     .build()?;
/// fleet.run(&mut NoopObserver)?;
/// ```
pub struct FleetBuilder<R: Router> {
    config:    FleetConfig,
    graph:     Arc<NavGraph>,
    router:    R,
    positions: Vec<VertexId>,
}

impl<R: Router> FleetBuilder<R> {
    pub fn new(graph: impl Into<Arc<NavGraph>>, router: R) -> Self {
        Self {
            config:    FleetConfig::default(),
            graph:     graph.into(),
            router,
            positions: Vec::new(),
        }
    }

    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn one robot per entry at build time.  Ids follow the order given,
    /// starting at `R0`.
    pub fn initial_positions(mut self, positions: Vec<VertexId>) -> Self {
        self.positions = positions;
        self
    }

    /// Validate the configuration, spawn the initial robots, and return a
    /// ready-to-run [`Fleet`].
    ///
    /// # Errors
    ///
    /// [`FleetError::Config`][crate::FleetError::Config] for an invalid
    /// configuration, or any error [`Fleet::spawn_robot`] returns for an
    /// initial position.
    pub fn build(self) -> FleetResult<Fleet<R>> {
        self.config.validate()?;
        let mut fleet = Fleet::new(self.config, self.graph, self.router);
        for vertex in self.positions {
            fleet.spawn_robot(vertex)?;
        }
        Ok(fleet)
    }
}
