//! Unit tests for fleet-traffic.

#[cfg(test)]
mod acquire_release {
    use fleet_core::{LaneId, RobotId, VertexId};

    use crate::{Acquire, Release, ReservationTable, Resource, TrafficError};

    const V1: Resource = Resource::Vertex(VertexId(1));
    const L1: Resource = Resource::Lane(LaneId(1));
    const R0: RobotId = RobotId(0);
    const R1: RobotId = RobotId(1);
    const R2: RobotId = RobotId(2);

    #[test]
    fn free_resource_is_granted() {
        let mut t = ReservationTable::new();
        assert_eq!(t.acquire(V1, R0), Acquire::Granted);
        assert_eq!(t.holder(V1), Some(R0));
        assert!(!t.is_free(V1));
        assert!(t.is_free(L1));
    }

    #[test]
    fn busy_resource_enqueues_in_order() {
        let mut t = ReservationTable::new();
        t.acquire(L1, R0);
        assert_eq!(t.acquire(L1, R1), Acquire::Enqueued { position: 1 });
        assert_eq!(t.acquire(L1, R2), Acquire::Enqueued { position: 2 });
        assert_eq!(t.waiters(L1), [R1, R2]);
        assert_eq!(t.waiting_count(), 2);
    }

    #[test]
    fn acquire_is_idempotent() {
        let mut t = ReservationTable::new();
        t.acquire(L1, R0);
        t.acquire(L1, R1);
        assert_eq!(t.acquire(L1, R0), Acquire::Granted);
        assert_eq!(t.acquire(L1, R1), Acquire::Enqueued { position: 1 });
        assert_eq!(t.queue_len(L1), 1);
        assert_eq!(t.waiting_count(), 1);
    }

    #[test]
    fn release_hands_over_fifo() {
        let mut t = ReservationTable::new();
        t.acquire(L1, R0);
        t.acquire(L1, R1);
        t.acquire(L1, R2);

        assert_eq!(t.release(L1, R0), Ok(Release::NextGranted(R1)));
        assert_eq!(t.holder(L1), Some(R1));
        assert_eq!(t.queue_position(L1, R2), Some(1));

        assert_eq!(t.release(L1, R1), Ok(Release::NextGranted(R2)));
        assert_eq!(t.release(L1, R2), Ok(Release::Free));
        assert!(t.is_free(L1));
        assert_eq!(t.waiting_count(), 0);
    }

    #[test]
    fn release_by_non_holder_is_an_error() {
        let mut t = ReservationTable::new();
        assert_eq!(
            t.release(V1, R0),
            Err(TrafficError::NotHolder { resource: V1, robot: R0, holder: None })
        );
        t.acquire(V1, R0);
        t.acquire(V1, R1);
        assert_eq!(
            t.release(V1, R1),
            Err(TrafficError::NotHolder { resource: V1, robot: R1, holder: Some(R0) })
        );
        // Failed release leaves state untouched.
        assert_eq!(t.holder(V1), Some(R0));
        assert_eq!(t.waiters(V1), [R1]);
    }

    #[test]
    fn cancel_removes_queue_entry_only() {
        let mut t = ReservationTable::new();
        t.acquire(L1, R0);
        t.acquire(L1, R1);
        t.acquire(L1, R2);
        assert!(t.cancel(L1, R1));
        assert!(!t.cancel(L1, R1));
        assert!(!t.cancel(L1, R0), "holders are not cancelled");
        assert_eq!(t.waiters(L1), [R2]);
        assert_eq!(t.release(L1, R0), Ok(Release::NextGranted(R2)));
    }

    #[test]
    fn vertex_and_lane_are_independent() {
        let mut t = ReservationTable::new();
        let v = Resource::Vertex(VertexId(5));
        let l = Resource::Lane(LaneId(5));
        assert_eq!(t.acquire(v, R0), Acquire::Granted);
        assert_eq!(t.acquire(l, R1), Acquire::Granted);
        assert_eq!(t.held_by(R0), [v]);
        assert_eq!(t.held_by(R1), [l]);
        assert_eq!(t.held_count(), 2);
    }

    #[test]
    fn holdings_sorted_and_clear() {
        let mut t = ReservationTable::new();
        t.acquire(L1, R1);
        t.acquire(V1, R0);
        assert_eq!(t.holdings(), [(V1, R0), (L1, R1)]);
        t.clear();
        assert!(t.holdings().is_empty());
        assert_eq!(t.waiting_count(), 0);
    }
}

#[cfg(test)]
mod properties {
    use fleet_core::{LaneId, RobotId};

    use crate::{Acquire, Release, ReservationTable, Resource};

    /// Drive many robots through one lane and check that every release hands
    /// the lane to the earliest remaining requester.
    #[test]
    fn strict_fifo_under_churn() {
        let lane = Resource::Lane(LaneId(0));
        let mut t = ReservationTable::new();
        let robots: Vec<RobotId> = (0..8).map(RobotId).collect();

        assert_eq!(t.acquire(lane, robots[0]), Acquire::Granted);
        for &r in &robots[1..] {
            assert!(matches!(t.acquire(lane, r), Acquire::Enqueued { .. }));
        }

        let mut order = vec![robots[0]];
        let mut holder = robots[0];
        loop {
            match t.release(lane, holder).unwrap() {
                Release::NextGranted(next) => {
                    order.push(next);
                    holder = next;
                }
                Release::Free => break,
            }
        }
        assert_eq!(order, robots);
    }

    #[test]
    fn holder_never_in_own_queue() {
        let lane = Resource::Lane(LaneId(3));
        let mut t = ReservationTable::new();
        t.acquire(lane, RobotId(0));
        for _ in 0..3 {
            t.acquire(lane, RobotId(0));
            t.acquire(lane, RobotId(1));
        }
        assert_eq!(t.waiters(lane), [RobotId(1)]);
        t.release(lane, RobotId(0)).unwrap();
        assert!(t.waiters(lane).is_empty());
        assert_eq!(t.holder(lane), Some(RobotId(1)));
    }
}
