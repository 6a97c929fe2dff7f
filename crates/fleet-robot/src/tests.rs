//! Unit tests for fleet-robot.

#[cfg(test)]
mod helpers {
    use fleet_core::{LaneId, Point2, VertexId};
    use fleet_graph::{NavGraph, NavGraphBuilder, Vertex};

    /// V1 → V2 → V3, V3 is a charging station.
    pub fn chain() -> NavGraph {
        let mut b = NavGraphBuilder::new();
        b.add_vertex(Vertex::new(VertexId(1), Point2::new(0.0, 0.0)));
        b.add_vertex(Vertex::new(VertexId(2), Point2::new(2.0, 0.0)));
        b.add_vertex(Vertex::new(VertexId(3), Point2::new(2.0, 2.0)).charging());
        b.add_lane(LaneId(1), VertexId(1), VertexId(2));
        b.add_lane(LaneId(2), VertexId(2), VertexId(3));
        b.build().unwrap()
    }
}

// ── State table ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod state_table {
    use crate::RobotState::{self, *};

    #[test]
    fn exhaustive_transition_table() {
        let allowed = [
            (Idle, Moving),
            (Idle, Arrived),
            (Idle, Charging),
            (Moving, Waiting),
            (Moving, Arrived),
            (Waiting, Moving),
            (Waiting, Arrived),
            (Charging, Idle),
            (Charging, Moving),
            (Charging, Arrived),
            (Arrived, Moving),
            (Arrived, Charging),
        ];
        for from in RobotState::ALL {
            for to in RobotState::ALL {
                let expected = from == to || allowed.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn charging_is_only_reachable_at_rest() {
        for from in RobotState::ALL {
            if from.can_transition_to(Charging) && from != Charging {
                assert!(matches!(from, Idle | Arrived), "{from}");
            }
        }
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = RobotState::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["idle", "moving", "waiting", "charging", "arrived"]);
        assert_eq!(RobotState::default(), Idle);
    }
}

// ── Movement bookkeeping ──────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use fleet_core::{LaneId, Point2, RobotId, VertexId};
    use fleet_graph::Route;
    use fleet_traffic::Resource;

    use super::helpers::chain;
    use crate::{Robot, RobotState};

    fn robot() -> Robot {
        Robot::spawn(RobotId(0), VertexId(1))
    }

    #[test]
    fn spawn_is_idle_at_vertex() {
        let r = robot();
        assert_eq!(r.state, RobotState::Idle);
        assert_eq!(r.occupied(), Resource::Vertex(VertexId(1)));
        assert!(!r.is_traversing());
        assert_eq!(r.charge_level, None);
    }

    #[test]
    fn assign_then_walk_the_path() {
        let g = chain();
        let mut r = robot();
        r.assign(VertexId(3), Route { lanes: vec![LaneId(1), LaneId(2)] });
        assert_eq!(r.state, RobotState::Moving);
        assert_eq!(r.next_resource(&g), Some(Resource::Lane(LaneId(1))));

        r.enter_lane(LaneId(1));
        assert_eq!(r.occupied(), Resource::Lane(LaneId(1)));
        assert_eq!(r.next_resource(&g), Some(Resource::Vertex(VertexId(2))));
        assert_eq!(r.plan_origin(&g), VertexId(2));

        assert_eq!(r.exit_lane(VertexId(2)), Some(LaneId(1)));
        assert_eq!(r.state, RobotState::Moving);
        assert_eq!(r.remaining_hops(), 1);

        r.enter_lane(LaneId(2));
        r.exit_lane(VertexId(3));
        assert_eq!(r.state, RobotState::Arrived);
        assert_eq!(r.current_vertex, VertexId(3));
        assert_eq!(r.next_resource(&g), None);
    }

    #[test]
    fn assign_to_own_vertex_arrives() {
        let mut r = robot();
        r.assign(VertexId(1), Route::default());
        assert_eq!(r.state, RobotState::Arrived);
        assert_eq!(r.destination, Some(VertexId(1)));
    }

    #[test]
    fn reassign_on_lane_keeps_current_lane() {
        let mut r = robot();
        r.assign(VertexId(3), Route { lanes: vec![LaneId(1), LaneId(2)] });
        r.enter_lane(LaneId(1));
        r.assign(VertexId(2), Route::default());
        assert_eq!(r.path, [LaneId(1)]);
        assert_eq!(r.state, RobotState::Moving);
    }

    #[test]
    fn wait_and_wake() {
        let mut r = robot();
        r.assign(VertexId(2), Route { lanes: vec![LaneId(1)] });
        r.wait_on(Resource::Lane(LaneId(1)));
        assert_eq!(r.state, RobotState::Waiting);
        assert_eq!(r.awaiting, Some(Resource::Lane(LaneId(1))));
        r.wake();
        assert_eq!(r.state, RobotState::Moving);
        r.enter_lane(LaneId(1));
        assert_eq!(r.awaiting, None);
    }

    #[test]
    fn position_is_lane_midpoint_while_traversing() {
        let g = chain();
        let mut r = robot();
        assert_eq!(r.position(&g), Some(Point2::new(0.0, 0.0)));
        r.assign(VertexId(2), Route { lanes: vec![LaneId(1)] });
        r.enter_lane(LaneId(1));
        assert_eq!(r.position(&g), Some(Point2::new(1.0, 0.0)));
    }
}

// ── Charging ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod charging {
    use fleet_core::{LaneId, RobotId, VertexId};
    use fleet_graph::Route;

    use crate::{Robot, RobotError, RobotState};

    fn at_station() -> Robot {
        Robot::spawn(RobotId(4), VertexId(3))
    }

    #[test]
    fn rejects_non_station_and_leaves_state() {
        let mut r = at_station();
        assert_eq!(
            r.begin_charging(false),
            Err(RobotError::NotAtChargingStation { robot: RobotId(4), vertex: VertexId(3) })
        );
        assert_eq!(r.state, RobotState::Idle);
        assert_eq!(r.charge_level, None);
    }

    #[test]
    fn rejects_while_moving() {
        let mut r = at_station();
        r.assign(VertexId(1), Route { lanes: vec![LaneId(9)] });
        assert_eq!(r.begin_charging(true), Err(RobotError::CurrentlyMoving(RobotId(4))));
        assert_eq!(r.state, RobotState::Moving);
    }

    #[test]
    fn charges_to_full_then_idles() {
        let mut r = at_station();
        r.begin_charging(true).unwrap();
        assert_eq!(r.charge_level, Some(0));
        let mut steps = 0;
        while !r.charge_step(30) {
            steps += 1;
            assert_eq!(r.state, RobotState::Charging);
        }
        assert_eq!(steps, 3);
        assert_eq!(r.charge_level, Some(100));
        assert_eq!(r.state, RobotState::Idle);
    }

    #[test]
    fn charge_level_persists_across_sessions() {
        let mut r = at_station();
        r.begin_charging(true).unwrap();
        r.charge_step(40);
        r.stop_charging().unwrap();
        assert_eq!(r.state, RobotState::Idle);
        r.begin_charging(true).unwrap();
        assert_eq!(r.charge_level, Some(40));
        assert!(r.begin_charging(true).is_ok(), "already charging is a no-op");
    }

    #[test]
    fn stop_when_not_charging() {
        let mut r = at_station();
        assert_eq!(r.stop_charging(), Err(RobotError::NotCharging(RobotId(4))));
    }

    #[test]
    fn assign_while_charging_departs_after() {
        let mut r = at_station();
        r.begin_charging(true).unwrap();
        r.assign(VertexId(1), Route { lanes: vec![LaneId(7)] });
        assert_eq!(r.state, RobotState::Charging);
        r.stop_charging().unwrap();
        assert_eq!(r.state, RobotState::Moving);
        assert_eq!(r.path, [LaneId(7)]);
    }

    #[test]
    fn own_vertex_assigned_while_charging_arrives() {
        let mut r = at_station();
        r.begin_charging(true).unwrap();
        r.assign(VertexId(3), Route { lanes: vec![] });
        assert_eq!(r.state, RobotState::Charging);
        assert!(r.charge_step(100));
        assert_eq!(r.state, RobotState::Arrived);
        assert_eq!(r.destination, Some(VertexId(3)));

        let mut r = at_station();
        r.begin_charging(true).unwrap();
        r.assign(VertexId(3), Route { lanes: vec![] });
        r.stop_charging().unwrap();
        assert_eq!(r.state, RobotState::Arrived);
    }

    #[test]
    fn charging_drops_finished_destination() {
        let mut r = at_station();
        r.assign(VertexId(3), Route { lanes: vec![] });
        assert_eq!(r.state, RobotState::Arrived);
        r.begin_charging(true).unwrap();
        assert_eq!(r.destination, None);
        r.stop_charging().unwrap();
        assert_eq!(r.state, RobotState::Idle);
    }
}
