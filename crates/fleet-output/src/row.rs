//! Plain data rows written by output backends.

use fleet_robot::RobotState;
use fleet_sim::{RobotStatus, TickReport};

/// One robot's status at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotSnapshotRow {
    pub robot_id:     u32,
    pub tick:         u64,
    pub state:        RobotState,
    /// The robot's vertex, or the vertex it left while on a lane.
    pub vertex:       u32,
    pub lane:         Option<u32>,
    pub destination:  Option<u32>,
    pub charge_level: Option<u8>,
}

impl RobotSnapshotRow {
    pub fn from_status(tick: u64, s: &RobotStatus) -> Self {
        Self {
            robot_id:     s.id.get(),
            tick,
            state:        s.state,
            vertex:       s.current_vertex.get(),
            lane:         s.current_lane.map(|l| l.get()),
            destination:  s.destination.map(|v| v.get()),
            charge_level: s.charge_level,
        }
    }
}

/// Per-tick movement and state totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:     u64,
    pub moved:    u32,
    pub waiting:  u32,
    pub arrived:  u32,
    pub charging: u32,
    pub commands: u32,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(r: &TickReport) -> Self {
        Self {
            tick:     r.tick.0,
            moved:    saturating_count(r.moved.len()),
            waiting:  saturating_count(r.counts.waiting),
            arrived:  saturating_count(r.arrivals.len()),
            charging: saturating_count(r.counts.charging),
            commands: saturating_count(r.commands.len()),
        }
    }
}

/// Counts beyond `u32::MAX` are written as `u32::MAX`.
fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
