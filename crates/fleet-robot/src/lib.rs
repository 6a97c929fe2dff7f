//! `fleet-robot`: the per-robot state machine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`state`] | `RobotState` and its transition table                        |
//! | [`robot`] | `Robot`: position, remaining path, charge, awaited resource  |
//! | [`error`] | `RobotError`, `RobotResult<T>`                               |
//!
//! # Movement model
//!
//! Robots occupy discrete resources.  A robot is either **at a vertex**
//! (`current_lane == None`) or **traversing a lane** (`current_lane ==
//! Some(_)`, and that lane is the front of `path`).  This crate only records
//! transitions; acquiring and releasing the matching reservations is the
//! fleet orchestrator's job, which calls [`Robot::enter_lane`] after it has
//! the lane and [`Robot::exit_lane`] after it has the lane's end vertex.
//!
//! ```text
//!            assign (path > 0)          acquire → Enqueued
//!   Idle ────────────────────▶ Moving ───────────────────▶ Waiting
//!    │ ▲                        │  ▲ ◀─────────────────────────┘
//!    │ │ stop / full            │  │      release hands over
//!    ▼ │                        ▼  │ assign
//!   Charging ◀───── charge ─── Arrived
//! ```
//!
//! A destination assigned while charging is taken up when charging ends:
//! `Moving` if there is a path, straight to `Arrived` if the robot is
//! already there.

pub mod error;
pub mod robot;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{RobotError, RobotResult};
pub use robot::{FULL_CHARGE, Robot};
pub use state::RobotState;
