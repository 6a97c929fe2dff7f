//! `fleet-sim`: the fleet orchestrator.
//!
//! # Tick loop
//!
//! ```text
//! for each tick:
//!   ① Commands : drain queued commands (direct submits first, then the
//!                 channel) and apply them in order.
//!   ② Robots   : visit every robot in ascending RobotId order:
//!                  Charging → gain charge_per_tick; leave when full
//!                  Moving   → at a vertex: acquire next lane, enter it,
//!                             release the vertex behind;
//!                             on a lane:  acquire its end vertex, exit,
//!                             release the lane; Arrived if path is empty
//!                  Waiting  → nothing until a release hands the awaited
//!                             resource over, which flips it to Moving
//!   ③ Report   : per-state tallies into the TickReport; observer hooks.
//! ```
//!
//! A robot crosses at most one lane per tick.  Every acquire is
//! non-blocking, so a tick always completes.  Circular waits are not
//! broken: the robots involved stay `Waiting`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_graph::BfsRouter;
//! use fleet_sim::{FleetBuilder, NoopObserver};
//!
//! let mut fleet = FleetBuilder::new(graph, BfsRouter).config(config).build()?;
//! let r = fleet.spawn_robot(VertexId(1))?;
//! fleet.assign_destination(r, VertexId(3))?;
//! fleet.run_ticks(2, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod status;


pub use builder::FleetBuilder;
pub use command::{Command, CommandOutcome, CommandOutput, CommandSender};
pub use error::{FleetError, FleetResult};
pub use fleet::Fleet;
pub use observer::{FleetObserver, NoopObserver};
pub use status::{RobotStatus, StatusCounts, TickReport};
