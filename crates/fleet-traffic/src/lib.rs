//! `fleet-traffic`: mutual exclusion for vertices and lanes.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`resource`]    | `Resource`: a vertex or a lane                         |
//! | [`reservation`] | `ReservationTable`, `Acquire`, `Release`               |
//! | [`error`]       | `TrafficError`, `TrafficResult<T>`                     |
//!
//! # Protocol
//!
//! Every resource has a holder slot and a FIFO wait queue.  `acquire` never
//! blocks: it either grants the slot or appends the robot to the queue.
//! `release` hands the slot straight to the head of the queue and reports
//! the new holder so the caller can wake it.  Grants are therefore strictly
//! first-come first-served per resource.
//!
//! The table is plain owned data with `&mut self` mutation; the fleet
//! orchestrator is its only owner and drives it from a single tick loop.

pub mod error;
pub mod reservation;
pub mod resource;

#[cfg(test)]
mod tests;

pub use error::{TrafficError, TrafficResult};
pub use reservation::{Acquire, Release, ReservationTable};
pub use resource::Resource;
