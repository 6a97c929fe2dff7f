//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Vertices and lanes are stored in dense `Vec`s in the order they were
//! added; hash indexes map the (possibly sparse) external ids to those
//! slots.  Outgoing lanes use **Compressed Sparse Row (CSR)** format: the
//! outgoing lanes of the vertex in slot `v` occupy
//!
//! ```text
//! out_lanes[ out_start[v] .. out_start[v+1] ]
//! ```
//!
//! The CSR arrays are filled with a counting sort over lane insertion order,
//! so each vertex's outgoing lanes keep the order in which they were added.
//! Breadth-first search relies on that order for deterministic tie-breaking.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a planar point to the nearest vertex, which
//! is how a front-end turns a click into a `VertexId`.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use fleet_core::{LaneId, Point2, VertexId};

use crate::router::{BfsRouter, Route, Router};
use crate::{GraphError, GraphResult};

// ── Vertex / Lane ─────────────────────────────────────────────────────────────

/// A discrete location in the navigation graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub id:                  VertexId,
    pub pos:                 Point2,
    /// Display name.  Defaults to the id's display form (`"V3"`).
    pub name:                String,
    pub is_charging_station: bool,
}

impl Vertex {
    /// A plain vertex named after its id.
    pub fn new(id: VertexId, pos: Point2) -> Self {
        Self { id, pos, name: id.to_string(), is_charging_station: false }
    }

    /// Mark this vertex as a charging station.
    pub fn charging(mut self) -> Self {
        self.is_charging_station = true;
        self
    }

    /// Replace the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A directed connection from `from` to `to`.
///
/// Traversal is only allowed in the stated direction; two-way corridors are
/// two lanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lane {
    pub id:   LaneId,
    pub from: VertexId,
    pub to:   VertexId,
}

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f32; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Immutable directed navigation graph.
///
/// Do not construct directly; use [`NavGraphBuilder`] or the JSON loader.
pub struct NavGraph {
    vertices:     Vec<Vertex>,
    vertex_slot:  FxHashMap<VertexId, u32>,

    lanes:        Vec<Lane>,
    lane_slot:    FxHashMap<LaneId, u32>,
    /// Slot of each lane's destination vertex, indexed by lane slot.
    lane_to_slot: Vec<u32>,

    /// CSR row pointer.  Length = `vertex_count + 1`.
    out_start:    Vec<u32>,
    /// Lane slots grouped by source vertex slot.
    out_lanes:    Vec<u32>,

    spatial_idx:  RTree<VertexEntry>,
}

impl NavGraph {
    /// A graph with no vertices or lanes.  Every route request fails.
    pub fn empty() -> Self {
        Self {
            vertices:     Vec::new(),
            vertex_slot:  FxHashMap::default(),
            lanes:        Vec::new(),
            lane_slot:    FxHashMap::default(),
            lane_to_slot: Vec::new(),
            out_start:    vec![0],
            out_lanes:    Vec::new(),
            spatial_idx:  RTree::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertex_slot.get(&id).map(|&s| &self.vertices[s as usize])
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lane_slot.get(&id).map(|&s| &self.lanes[s as usize])
    }

    #[inline]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex_slot.contains_key(&id)
    }

    /// `true` if `id` exists and is flagged as a charging station.
    pub fn is_charging_station(&self, id: VertexId) -> bool {
        self.vertex(id).is_some_and(|v| v.is_charging_station)
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    /// All lanes in insertion order.
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> + '_ {
        self.lanes.iter()
    }

    /// Ids of every charging station, in insertion order.
    pub fn charging_stations(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|v| v.is_charging_station)
            .map(|v| v.id)
            .collect()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing lanes of `vertex` in insertion order.  Empty for unknown
    /// vertices.
    pub fn out_lanes(&self, vertex: VertexId) -> impl Iterator<Item = &Lane> + '_ {
        let slots = match self.vertex_slot.get(&vertex) {
            Some(&s) => self.out_lane_slots(s as usize),
            None => &[],
        };
        slots.iter().map(|&l| &self.lanes[l as usize])
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.out_lanes(vertex).count()
    }

    /// The first lane leading directly from `from` to `to`, if any.
    pub fn lane_between(&self, from: VertexId, to: VertexId) -> Option<&Lane> {
        self.out_lanes(from).find(|l| l.to == to)
    }

    /// Euclidean length of a lane.
    pub fn lane_length(&self, id: LaneId) -> Option<f32> {
        let lane = self.lane(id)?;
        let a = self.vertex(lane.from)?.pos;
        let b = self.vertex(lane.to)?.pos;
        Some(a.distance(b))
    }

    /// Shortest path (fewest lanes) from `from` to `to` using breadth-first
    /// search.  See [`BfsRouter`].
    pub fn find_path(&self, from: VertexId, to: VertexId) -> GraphResult<Route> {
        BfsRouter.route(self, from, to)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The vertex closest to `pos`.  `None` only for an empty graph.
    pub fn nearest_vertex(&self, pos: Point2) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }

    /// Up to `k` vertices closest to `pos`, nearest first.
    pub fn k_nearest_vertices(&self, pos: Point2, k: usize) -> Vec<VertexId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Slot-level access for the router ──────────────────────────────────

    #[inline]
    pub(crate) fn slot_of(&self, id: VertexId) -> Option<usize> {
        self.vertex_slot.get(&id).map(|&s| s as usize)
    }

    #[inline]
    pub(crate) fn out_lane_slots(&self, vertex_slot: usize) -> &[u32] {
        let start = self.out_start[vertex_slot] as usize;
        let end = self.out_start[vertex_slot + 1] as usize;
        &self.out_lanes[start..end]
    }

    #[inline]
    pub(crate) fn lane_at(&self, lane_slot: u32) -> &Lane {
        &self.lanes[lane_slot as usize]
    }

    #[inline]
    pub(crate) fn lane_target_slot(&self, lane_slot: u32) -> usize {
        self.lane_to_slot[lane_slot as usize] as usize
    }
}

impl std::fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavGraph")
            .field("vertices", &self.vertices.len())
            .field("lanes", &self.lanes.len())
            .finish()
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// Vertices and lanes may be added in any order; `build()` validates ids
/// and endpoints and fails fast on malformed input.
///
/// # Example
///
/// ```
/// use fleet_core::{LaneId, Point2, VertexId};
/// use fleet_graph::{NavGraphBuilder, Vertex};
///
/// let mut b = NavGraphBuilder::new();
/// b.add_vertex(Vertex::new(VertexId(1), Point2::new(0.0, 0.0)));
/// b.add_vertex(Vertex::new(VertexId(2), Point2::new(5.0, 0.0)).charging());
/// b.add_two_way_lane(LaneId(1), LaneId(2), VertexId(1), VertexId(2));
/// let graph = b.build().unwrap();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.lane_count(), 2);
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    vertices: Vec<Vertex>,
    lanes:    Vec<Lane>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, lanes: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            lanes:    Vec::with_capacity(lanes),
        }
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = vertex.id;
        self.vertices.push(vertex);
        id
    }

    /// Add a **directed** lane from `from` to `to`.
    pub fn add_lane(&mut self, id: LaneId, from: VertexId, to: VertexId) -> LaneId {
        self.lanes.push(Lane { id, from, to });
        id
    }

    /// Add a lane in each direction between `a` and `b`.
    pub fn add_two_way_lane(&mut self, forward: LaneId, reverse: LaneId, a: VertexId, b: VertexId) {
        self.add_lane(forward, a, b);
        self.add_lane(reverse, b, a);
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn lane_count(&self) -> usize { self.lanes.len() }

    /// Validate and consume the builder.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateVertex`] / [`GraphError::DuplicateLane`] when
    ///   an id is used twice.
    /// - [`GraphError::DanglingLane`] when a lane endpoint is not a vertex.
    pub fn build(self) -> GraphResult<NavGraph> {
        let vertex_count = self.vertices.len();

        let mut vertex_slot = FxHashMap::default();
        vertex_slot.reserve(vertex_count);
        for (slot, v) in self.vertices.iter().enumerate() {
            if vertex_slot.insert(v.id, slot as u32).is_some() {
                return Err(GraphError::DuplicateVertex(v.id));
            }
        }

        let mut lane_slot = FxHashMap::default();
        lane_slot.reserve(self.lanes.len());
        let mut lane_from_slot = Vec::with_capacity(self.lanes.len());
        let mut lane_to_slot = Vec::with_capacity(self.lanes.len());
        for (slot, lane) in self.lanes.iter().enumerate() {
            if lane_slot.insert(lane.id, slot as u32).is_some() {
                return Err(GraphError::DuplicateLane(lane.id));
            }
            let from = *vertex_slot
                .get(&lane.from)
                .ok_or(GraphError::DanglingLane { lane: lane.id, vertex: lane.from })?;
            let to = *vertex_slot
                .get(&lane.to)
                .ok_or(GraphError::DanglingLane { lane: lane.id, vertex: lane.to })?;
            lane_from_slot.push(from);
            lane_to_slot.push(to);
        }

        // Counting sort by source slot; stable, so insertion order survives.
        let mut out_start = vec![0u32; vertex_count + 1];
        for &from in &lane_from_slot {
            out_start[from as usize + 1] += 1;
        }
        for i in 1..=vertex_count {
            out_start[i] += out_start[i - 1];
        }
        let mut cursor: Vec<u32> = out_start[..vertex_count].to_vec();
        let mut out_lanes = vec![0u32; self.lanes.len()];
        for (lane, &from) in lane_from_slot.iter().enumerate() {
            let at = &mut cursor[from as usize];
            out_lanes[*at as usize] = lane as u32;
            *at += 1;
        }

        let entries: Vec<VertexEntry> = self
            .vertices
            .iter()
            .map(|v| VertexEntry { point: v.pos.to_array(), id: v.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(NavGraph {
            vertices: self.vertices,
            vertex_slot,
            lanes: self.lanes,
            lane_slot,
            lane_to_slot,
            out_start,
            out_lanes,
            spatial_idx,
        })
    }
}
