//! Routing trait and default breadth-first implementation.
//!
//! # Pluggability
//!
//! The fleet orchestrator calls routing through the [`Router`] trait, so an
//! application can swap in a weighted or congestion-aware planner without
//! touching the orchestrator.  The default [`BfsRouter`] minimises the number
//! of lane traversals, which is the contract the traffic model is built on.

use std::collections::VecDeque;

use fleet_core::{LaneId, VertexId};

use crate::graph::NavGraph;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the lanes to traverse, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub lanes: Vec<LaneId>,
}

impl Route {
    /// Number of lane traversals.
    pub fn hops(&self) -> usize {
        self.lanes.len()
    }

    /// `true` if source and destination are the same vertex.
    pub fn is_trivial(&self) -> bool {
        self.lanes.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the graph is read-only, so one
/// router may serve concurrent requests from any number of threads.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields an empty route rather than an error.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] for unknown endpoints,
    /// [`GraphError::NoRoute`] when `to` is unreachable.
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route>;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Breadth-first search over directed lane adjacency.
///
/// Returns a path with the fewest lane traversals.  Ties go to the lane
/// discovered first in breadth order, which follows each vertex's lane
/// insertion order, so results are reproducible for a fixed graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
        bfs(graph, from, to)
    }
}

fn bfs(graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
    let src = graph.slot_of(from).ok_or(GraphError::VertexNotFound(from))?;
    let dst = graph.slot_of(to).ok_or(GraphError::VertexNotFound(to))?;
    if src == dst {
        return Ok(Route::default());
    }

    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    // prev_lane[v] = lane slot that first reached v.
    let mut prev_lane: Vec<Option<u32>> = vec![None; n];
    let mut frontier = VecDeque::new();

    visited[src] = true;
    frontier.push_back(src);

    while let Some(vertex) = frontier.pop_front() {
        for &lane in graph.out_lane_slots(vertex) {
            let next = graph.lane_target_slot(lane);
            if visited[next] {
                continue;
            }
            visited[next] = true;
            prev_lane[next] = Some(lane);
            if next == dst {
                return Ok(reconstruct(graph, &prev_lane, src, dst));
            }
            frontier.push_back(next);
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(graph: &NavGraph, prev_lane: &[Option<u32>], src: usize, dst: usize) -> Route {
    let mut lanes = Vec::new();
    let mut cur = dst;
    while cur != src {
        let Some(slot) = prev_lane[cur] else { break };
        let lane = graph.lane_at(slot);
        lanes.push(lane.id);
        cur = graph.slot_of(lane.from).unwrap_or(src);
    }
    lanes.reverse();
    Route { lanes }
}
