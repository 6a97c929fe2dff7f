use fleet_core::RobotId;
use thiserror::Error;

use crate::Resource;

/// Reservation precondition failures.  These indicate a bookkeeping bug in
/// the caller, never bad external input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrafficError {
    #[error("{robot} released {resource} but the holder is {holder:?}")]
    NotHolder {
        resource: Resource,
        robot:    RobotId,
        holder:   Option<RobotId>,
    },
}

pub type TrafficResult<T> = Result<T, TrafficError>;
