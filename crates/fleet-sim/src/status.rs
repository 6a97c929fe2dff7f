//! Read-only views of fleet state.

use fleet_core::{LaneId, Point2, RobotId, Tick, VertexId};
use fleet_robot::RobotState;
use fleet_traffic::Resource;

use crate::CommandOutcome;

/// One robot as seen by the control surface.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotStatus {
    pub id:             RobotId,
    pub state:          RobotState,
    /// The robot's vertex, or the vertex it left while on a lane.
    pub current_vertex: VertexId,
    pub current_lane:   Option<LaneId>,
    pub destination:    Option<VertexId>,
    pub remaining_hops: usize,
    /// Set while `Waiting`.
    pub waiting_for:    Option<Resource>,
    /// 1-based position in the wait queue of `waiting_for`.
    pub queue_position: Option<usize>,
    /// Current holder of `waiting_for`.
    pub blocked_by:     Option<RobotId>,
    pub charge_level:   Option<u8>,
    pub position:       Option<Point2>,
}

/// Number of robots in each state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub idle:     usize,
    pub moving:   usize,
    pub waiting:  usize,
    pub charging: usize,
    pub arrived:  usize,
}

impl StatusCounts {
    pub fn record(&mut self, state: RobotState) {
        match state {
            RobotState::Idle     => self.idle += 1,
            RobotState::Moving   => self.moving += 1,
            RobotState::Waiting  => self.waiting += 1,
            RobotState::Charging => self.charging += 1,
            RobotState::Arrived  => self.arrived += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.idle + self.moving + self.waiting + self.charging + self.arrived
    }
}

/// Everything that happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub tick:          Tick,
    /// Commands applied at the start of the tick, in order.
    pub commands:      Vec<CommandOutcome>,
    /// Robots that entered or left a lane.
    pub moved:         Vec<RobotId>,
    /// Robots that reached their destination, with where.
    pub arrivals:      Vec<(RobotId, VertexId)>,
    /// Robots whose charge reached full.
    pub fully_charged: Vec<RobotId>,
    /// State tallies after the tick.
    pub counts:        StatusCounts,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    pub fn rejected_commands(&self) -> usize {
        self.commands.iter().filter(|c| !c.is_ok()).count()
    }
}
