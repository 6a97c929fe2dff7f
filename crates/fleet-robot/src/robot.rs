//! `Robot`: one robot's position, remaining path, and charge.

use std::collections::VecDeque;

use fleet_core::{LaneId, Point2, RobotId, VertexId};
use fleet_graph::{NavGraph, Route};
use fleet_traffic::Resource;

use crate::{RobotError, RobotResult, RobotState};

/// Charge level at which charging stops on its own.
pub const FULL_CHARGE: u8 = 100;

/// A single robot.
///
/// `path` holds the lanes still to traverse.  While the robot is on a lane,
/// that lane is `path.front()` and `current_lane` names it; `current_vertex`
/// is then the vertex the robot left.
#[derive(Clone, Debug, PartialEq)]
pub struct Robot {
    pub id:             RobotId,
    pub current_vertex: VertexId,
    pub current_lane:   Option<LaneId>,
    pub destination:    Option<VertexId>,
    pub path:           VecDeque<LaneId>,
    pub state:          RobotState,
    /// Percent, `None` until the robot first charges.
    pub charge_level:   Option<u8>,
    /// The resource this robot is queued for or was just handed.
    pub awaiting:       Option<Resource>,
}

impl Robot {
    /// A new `Idle` robot standing on `vertex`.
    pub fn spawn(id: RobotId, vertex: VertexId) -> Self {
        Self {
            id,
            current_vertex: vertex,
            current_lane:   None,
            destination:    None,
            path:           VecDeque::new(),
            state:          RobotState::Idle,
            charge_level:   None,
            awaiting:       None,
        }
    }

    #[inline]
    pub fn is_traversing(&self) -> bool {
        self.current_lane.is_some()
    }

    /// The resource that stands for this robot's position.
    pub fn occupied(&self) -> Resource {
        match self.current_lane {
            Some(lane) => Resource::Lane(lane),
            None => Resource::Vertex(self.current_vertex),
        }
    }

    /// The vertex new routes must start from: the end of the current lane
    /// while traversing, otherwise the current vertex.
    pub fn plan_origin(&self, graph: &NavGraph) -> VertexId {
        self.current_lane
            .and_then(|l| graph.lane(l))
            .map_or(self.current_vertex, |l| l.to)
    }

    /// The next resource this robot has to acquire to make progress.
    pub fn next_resource(&self, graph: &NavGraph) -> Option<Resource> {
        match self.current_lane {
            Some(lane) => graph.lane(lane).map(|l| Resource::Vertex(l.to)),
            None => self.path.front().map(|&l| Resource::Lane(l)),
        }
    }

    pub fn remaining_hops(&self) -> usize {
        self.path.len()
    }

    /// Where the robot is drawn: its vertex, or the midpoint of its lane.
    pub fn position(&self, graph: &NavGraph) -> Option<Point2> {
        match self.current_lane {
            Some(lane) => {
                let lane = graph.lane(lane)?;
                let a = graph.vertex(lane.from)?.pos;
                let b = graph.vertex(lane.to)?.pos;
                Some(a.lerp(b, 0.5))
            }
            None => graph.vertex(self.current_vertex).map(|v| v.pos),
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn set_state(&mut self, next: RobotState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "{}: illegal transition {} -> {}",
            self.id,
            self.state,
            next
        );
        self.state = next;
    }

    /// Install a new destination and the route to it from [`plan_origin`].
    ///
    /// A robot on a lane keeps that lane at the head of its path.  A charging
    /// robot stores the route and starts on it once charging ends.
    ///
    /// [`plan_origin`]: Robot::plan_origin
    pub fn assign(&mut self, destination: VertexId, route: Route) {
        let mut path: VecDeque<LaneId> = route.lanes.into();
        if let Some(lane) = self.current_lane {
            path.push_front(lane);
        }
        self.path = path;
        self.destination = Some(destination);
        if self.state == RobotState::Charging {
            return;
        }
        let next = if self.path.is_empty() { RobotState::Arrived } else { RobotState::Moving };
        self.set_state(next);
    }

    /// Queue behind `resource`.
    pub fn wait_on(&mut self, resource: Resource) {
        self.awaiting = Some(resource);
        self.set_state(RobotState::Waiting);
    }

    /// The awaited resource has been handed over.
    pub fn wake(&mut self) {
        if self.state == RobotState::Waiting {
            self.set_state(RobotState::Moving);
        }
    }

    /// Step onto `lane`, which must be the head of the path.
    pub fn enter_lane(&mut self, lane: LaneId) {
        debug_assert_eq!(self.path.front(), Some(&lane));
        self.current_lane = Some(lane);
        self.awaiting = None;
        self.set_state(RobotState::Moving);
    }

    /// Leave the current lane at `vertex`.  Returns the lane left behind.
    /// Becomes `Arrived` when the path runs out.
    pub fn exit_lane(&mut self, vertex: VertexId) -> Option<LaneId> {
        let lane = self.current_lane.take();
        self.path.pop_front();
        self.current_vertex = vertex;
        self.awaiting = None;
        if self.path.is_empty() {
            self.set_state(RobotState::Arrived);
        }
        lane
    }

    /// Start charging.  Already charging is a no-op.  A finished trip's
    /// destination is dropped.
    ///
    /// # Errors
    ///
    /// [`RobotError::CurrentlyMoving`] while the robot has a path in
    /// progress, [`RobotError::NotAtChargingStation`] when `at_station` is
    /// false.
    pub fn begin_charging(&mut self, at_station: bool) -> RobotResult<()> {
        if self.state == RobotState::Charging {
            return Ok(());
        }
        if self.state.is_in_motion() || self.is_traversing() {
            return Err(RobotError::CurrentlyMoving(self.id));
        }
        if !at_station {
            return Err(RobotError::NotAtChargingStation {
                robot:  self.id,
                vertex: self.current_vertex,
            });
        }
        self.charge_level.get_or_insert(0);
        self.destination = None;
        self.set_state(RobotState::Charging);
        Ok(())
    }

    /// Add `rate` percent of charge.  Returns `true` when the robot reached
    /// [`FULL_CHARGE`] and stopped charging.
    pub fn charge_step(&mut self, rate: u8) -> bool {
        if self.state != RobotState::Charging {
            return false;
        }
        let level = self.charge_level.unwrap_or(0).saturating_add(rate).min(FULL_CHARGE);
        self.charge_level = Some(level);
        if level >= FULL_CHARGE {
            self.finish_charging();
            return true;
        }
        false
    }

    /// # Errors
    ///
    /// [`RobotError::NotCharging`] if the robot is not charging.
    pub fn stop_charging(&mut self) -> RobotResult<()> {
        if self.state != RobotState::Charging {
            return Err(RobotError::NotCharging(self.id));
        }
        self.finish_charging();
        Ok(())
    }

    /// Leave `Charging` for whatever was assigned meanwhile: the path if
    /// there is one, `Arrived` if the destination is this vertex, else `Idle`.
    fn finish_charging(&mut self) {
        let next = match (self.path.is_empty(), self.destination) {
            (false, _)      => RobotState::Moving,
            (true, Some(_)) => RobotState::Arrived,
            (true, None)    => RobotState::Idle,
        };
        self.set_state(next);
    }
}
