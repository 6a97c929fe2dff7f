use fleet_core::{CoreError, LaneId, RobotId, VertexId};
use fleet_graph::GraphError;
use fleet_robot::RobotError;
use fleet_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    /// Unknown vertex.  Returned by `spawn_robot`, and by
    /// `assign_destination` for a destination outside the graph.
    #[error("vertex {0} does not exist")]
    VertexNotFound(VertexId),

    #[error("vertex {vertex} is occupied by {occupant}")]
    VertexOccupied { vertex: VertexId, occupant: RobotId },

    #[error("robot {0} does not exist")]
    RobotNotFound(RobotId),

    #[error("no path from {from} to {to} for {robot}")]
    NoPathFound {
        robot: RobotId,
        from:  VertexId,
        to:    VertexId,
    },

    #[error("{robot} is at {vertex}, which is not a charging station")]
    NotAtChargingStation { robot: RobotId, vertex: VertexId },

    #[error("{0} is moving")]
    CurrentlyMoving(RobotId),

    #[error("{0} is not charging")]
    NotCharging(RobotId),

    /// Corrupted reservation state.  Aborts the tick that hit it.
    #[error("reservation invariant violated: {0}")]
    ReservationInvariantViolation(#[from] TrafficError),

    #[error("lane {0} is not part of the navigation graph")]
    UnknownLane(LaneId),

    #[error("routing error: {0}")]
    Graph(GraphError),

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("fleet is no longer accepting commands")]
    Disconnected,
}

impl FleetError {
    /// `true` for errors that indicate broken internal state rather than a
    /// rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FleetError::ReservationInvariantViolation(_) | FleetError::UnknownLane(_))
    }
}

impl From<RobotError> for FleetError {
    fn from(e: RobotError) -> Self {
        match e {
            RobotError::NotAtChargingStation { robot, vertex } => {
                FleetError::NotAtChargingStation { robot, vertex }
            }
            RobotError::CurrentlyMoving(robot) => FleetError::CurrentlyMoving(robot),
            RobotError::NotCharging(robot) => FleetError::NotCharging(robot),
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
