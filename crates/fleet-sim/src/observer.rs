//! Fleet observer trait for progress reporting and data collection.

use fleet_core::{RobotId, Tick, VertexId};

use crate::{CommandOutcome, RobotStatus, TickReport};

/// Callbacks invoked by [`Fleet`][crate::Fleet] at key points in the tick
/// loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl FleetObserver for Arrivals {
///     fn on_arrival(&mut self, _tick: Tick, _robot: RobotId, _vertex: VertexId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before commands are applied.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per queued command after it has been applied, whether it
    /// succeeded or not.
    fn on_command(&mut self, _tick: Tick, _outcome: &CommandOutcome) {}

    /// Called when a robot reaches its destination by moving.
    fn on_arrival(&mut self, _tick: Tick, _robot: RobotId, _vertex: VertexId) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called every `config.output_interval_ticks` ticks with every robot's
    /// status in ascending id order.
    fn on_snapshot(&mut self, _tick: Tick, _robots: &[RobotStatus]) {}

    /// Called once after [`Fleet::run`][crate::Fleet::run] completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}
