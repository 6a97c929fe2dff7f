use fleet_core::{RobotId, VertexId};
use thiserror::Error;

/// Rejected charge commands.  The robot is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RobotError {
    #[error("{robot} is at {vertex}, which is not a charging station")]
    NotAtChargingStation { robot: RobotId, vertex: VertexId },

    #[error("{0} is moving")]
    CurrentlyMoving(RobotId),

    #[error("{0} is not charging")]
    NotCharging(RobotId),
}

pub type RobotResult<T> = Result<T, RobotError>;
