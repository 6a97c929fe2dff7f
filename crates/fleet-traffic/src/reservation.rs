//! `ReservationTable`: holder slots and FIFO wait queues for every resource.
//!
//! Entries are created lazily on first `acquire` and dropped again once a
//! resource has neither a holder nor waiters, so the table only ever holds
//! the resources that are actually contended or occupied.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

use fleet_core::RobotId;

use crate::{Resource, TrafficError, TrafficResult};

/// Outcome of [`ReservationTable::acquire`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Acquire {
    /// The robot now holds the resource.
    Granted,
    /// The resource is held by someone else; the robot sits at `position`
    /// (1-based) in its wait queue.
    Enqueued { position: usize },
}

/// Outcome of [`ReservationTable::release`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Release {
    /// The head of the wait queue was installed as the new holder.
    NextGranted(RobotId),
    /// Nobody was waiting; the resource is now free.
    Free,
}

#[derive(Default, Debug)]
struct Slot {
    holder: Option<RobotId>,
    queue:  VecDeque<RobotId>,
}

impl Slot {
    fn is_vacant(&self) -> bool {
        self.holder.is_none() && self.queue.is_empty()
    }
}

/// Mutual-exclusion state for every vertex and lane.
///
/// Invariants:
/// - a resource has at most one holder;
/// - a robot appears at most once per resource, either as holder or in the
///   queue, never both;
/// - a non-empty queue implies a holder.
#[derive(Default, Debug)]
pub struct ReservationTable {
    slots: FxHashMap<Resource, Slot>,
    /// Cached count of queued entries across all resources.
    waiting: usize,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `resource` for `robot`.  Never blocks.
    ///
    /// Re-acquiring a resource the robot already holds is `Granted`; asking
    /// again while queued returns the current queue position without
    /// enqueuing twice.
    pub fn acquire(&mut self, resource: Resource, robot: RobotId) -> Acquire {
        let slot = self.slots.entry(resource).or_default();
        match slot.holder {
            None => {
                slot.holder = Some(robot);
                debug!(%robot, %resource, "granted");
                Acquire::Granted
            }
            Some(h) if h == robot => Acquire::Granted,
            Some(holder) => {
                if let Some(i) = slot.queue.iter().position(|&r| r == robot) {
                    return Acquire::Enqueued { position: i + 1 };
                }
                slot.queue.push_back(robot);
                self.waiting += 1;
                let position = slot.queue.len();
                debug!(%robot, %resource, %holder, position, "enqueued");
                Acquire::Enqueued { position }
            }
        }
    }

    /// Give up `resource`.  If robots are waiting, the head of the queue
    /// becomes the holder and is returned so the caller can wake it.
    ///
    /// # Errors
    ///
    /// [`TrafficError::NotHolder`] if `robot` does not hold `resource`.
    pub fn release(&mut self, resource: Resource, robot: RobotId) -> TrafficResult<Release> {
        let Some(slot) = self.slots.get_mut(&resource) else {
            return Err(TrafficError::NotHolder { resource, robot, holder: None });
        };
        if slot.holder != Some(robot) {
            return Err(TrafficError::NotHolder { resource, robot, holder: slot.holder });
        }

        slot.holder = slot.queue.pop_front();
        let outcome = match slot.holder {
            Some(next) => {
                self.waiting -= 1;
                debug!(%robot, %resource, %next, "released, handed over");
                Release::NextGranted(next)
            }
            None => {
                debug!(%robot, %resource, "released");
                Release::Free
            }
        };
        if slot.is_vacant() {
            self.slots.remove(&resource);
        }
        Ok(outcome)
    }

    /// Remove `robot` from the wait queue of `resource`.  Returns `true` if
    /// it was queued.  Holders are unaffected.
    pub fn cancel(&mut self, resource: Resource, robot: RobotId) -> bool {
        let Some(slot) = self.slots.get_mut(&resource) else {
            return false;
        };
        let Some(i) = slot.queue.iter().position(|&r| r == robot) else {
            return false;
        };
        slot.queue.remove(i);
        self.waiting -= 1;
        debug!(%robot, %resource, "wait cancelled");
        if slot.is_vacant() {
            self.slots.remove(&resource);
        }
        true
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Current holder of `resource`.
    pub fn holder(&self, resource: Resource) -> Option<RobotId> {
        self.slots.get(&resource).and_then(|s| s.holder)
    }

    pub fn is_free(&self, resource: Resource) -> bool {
        self.holder(resource).is_none()
    }

    /// 1-based position of `robot` in the wait queue of `resource`.
    pub fn queue_position(&self, resource: Resource, robot: RobotId) -> Option<usize> {
        self.slots
            .get(&resource)
            .and_then(|s| s.queue.iter().position(|&r| r == robot))
            .map(|i| i + 1)
    }

    /// Robots waiting for `resource`, head first.
    pub fn waiters(&self, resource: Resource) -> Vec<RobotId> {
        self.slots
            .get(&resource)
            .map(|s| s.queue.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn queue_len(&self, resource: Resource) -> usize {
        self.slots.get(&resource).map_or(0, |s| s.queue.len())
    }

    /// Every resource held by `robot`, sorted.
    pub fn held_by(&self, robot: RobotId) -> Vec<Resource> {
        let mut held: Vec<Resource> = self
            .slots
            .iter()
            .filter(|(_, s)| s.holder == Some(robot))
            .map(|(&r, _)| r)
            .collect();
        held.sort_unstable();
        held
    }

    /// Every `(resource, holder)` pair, sorted by resource.
    pub fn holdings(&self) -> Vec<(Resource, RobotId)> {
        let mut all: Vec<(Resource, RobotId)> = self
            .slots
            .iter()
            .filter_map(|(&r, s)| s.holder.map(|h| (r, h)))
            .collect();
        all.sort_unstable();
        all
    }

    /// Number of held resources.
    pub fn held_count(&self) -> usize {
        self.slots.values().filter(|s| s.holder.is_some()).count()
    }

    /// Total queued entries across all resources.
    pub fn waiting_count(&self) -> usize {
        self.waiting
    }

    /// Drop every reservation and queue entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.waiting = 0;
    }
}
