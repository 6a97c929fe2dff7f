//! Robot lifecycle states.

use std::fmt;

/// The state of one robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RobotState {
    /// Freshly spawned or done charging; no destination.
    #[default]
    Idle,
    /// Holds, or is about to request, the next resource on its path.
    Moving,
    /// Queued behind another robot for the next resource on its path.
    Waiting,
    /// Gaining charge at a charging station.
    Charging,
    /// Reached its destination; ready for a new one.
    Arrived,
}

impl RobotState {
    pub const ALL: [RobotState; 5] = [
        RobotState::Idle,
        RobotState::Moving,
        RobotState::Waiting,
        RobotState::Charging,
        RobotState::Arrived,
    ];

    /// Transition table.  Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: RobotState) -> bool {
        use RobotState::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Idle, Moving)
                | (Idle, Arrived)
                | (Idle, Charging)
                | (Moving, Waiting)
                | (Moving, Arrived)
                | (Waiting, Moving)
                | (Waiting, Arrived)
                | (Charging, Idle)
                | (Charging, Moving)
                | (Charging, Arrived)
                | (Arrived, Moving)
                | (Arrived, Charging)
        )
    }

    /// `true` while the robot has a path it is working through.
    #[inline]
    pub fn is_in_motion(self) -> bool {
        matches!(self, RobotState::Moving | RobotState::Waiting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RobotState::Idle     => "idle",
            RobotState::Moving   => "moving",
            RobotState::Waiting  => "waiting",
            RobotState::Charging => "charging",
            RobotState::Arrived  => "arrived",
        }
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
