//! JSON navigation-graph loader.
//!
//! # Format
//!
//! ```json
//! {
//!   "levels": {
//!     "L1": {
//!       "vertices": [[x, y, {"name": "dock", "is_charger": true}], ...],
//!       "lanes":    [[from_index, to_index, {"bidirectional": false}], ...]
//!     }
//!   }
//! }
//! ```
//!
//! Vertex ids are positions in the `vertices` array and lane ids are
//! positions in the `lanes` array.  A two-way lane gets its reverse lane id
//! allocated after every listed lane, unless the file already lists that
//! reverse direction.  Unknown property keys are ignored.
//!
//! Validation happens in [`NavGraphBuilder::build`], so a malformed file
//! fails here, before any robot is spawned.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use fleet_core::{LaneId, Point2, VertexId};

use crate::{GraphError, GraphResult, NavGraph, NavGraphBuilder, Vertex};

/// Loader options.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Level to load.  `None` takes the first level in key order.
    pub level: Option<String>,
    /// Treat every lane as two-way regardless of its `bidirectional` flag.
    pub all_bidirectional: bool,
}

// ── Raw file records ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawNavGraph {
    levels: BTreeMap<String, RawLevel>,
}

#[derive(Deserialize)]
struct RawLevel {
    #[serde(default)]
    vertices: Vec<RawVertex>,
    #[serde(default)]
    lanes: Vec<RawLane>,
}

#[derive(Deserialize)]
struct RawVertex(f32, f32, VertexProps);

#[derive(Deserialize, Default)]
struct VertexProps {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_charger: bool,
}

#[derive(Deserialize)]
struct RawLane(u32, u32, LaneProps);

#[derive(Deserialize, Default)]
struct LaneProps {
    #[serde(default)]
    bidirectional: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a navigation graph from a JSON file at `path`.
pub fn load_nav_graph_json(path: &Path, options: &LoadOptions) -> GraphResult<NavGraph> {
    let file = File::open(path)?;
    load_nav_graph_reader(BufReader::new(file), options)
}

/// Load a navigation graph from any JSON reader (file, network stream,
/// in-memory `&[u8]`).
pub fn load_nav_graph_reader<R: Read>(reader: R, options: &LoadOptions) -> GraphResult<NavGraph> {
    let raw: RawNavGraph = serde_json::from_reader(reader)?;

    let (level_name, level) = match &options.level {
        Some(name) => raw
            .levels
            .get_key_value(name)
            .ok_or_else(|| GraphError::Parse(format!("level {name:?} not found")))?,
        None => raw
            .levels
            .iter()
            .next()
            .ok_or_else(|| GraphError::Parse("graph has no levels".into()))?,
    };

    let mut b = NavGraphBuilder::with_capacity(level.vertices.len(), level.lanes.len() * 2);

    for (i, RawVertex(x, y, props)) in level.vertices.iter().enumerate() {
        let id = VertexId::try_from(i)
            .map_err(|_| GraphError::Parse(format!("vertex index {i} out of range")))?;
        let mut vertex = Vertex::new(id, Point2::new(*x, *y));
        if let Some(name) = props.name.as_deref().filter(|n| !n.is_empty()) {
            vertex = vertex.named(name);
        }
        if props.is_charger {
            vertex = vertex.charging();
        }
        b.add_vertex(vertex);
    }

    let listed: HashSet<(u32, u32)> = level.lanes.iter().map(|l| (l.0, l.1)).collect();
    let mut next_reverse = level.lanes.len();

    for (i, RawLane(from, to, props)) in level.lanes.iter().enumerate() {
        let id = LaneId::try_from(i)
            .map_err(|_| GraphError::Parse(format!("lane index {i} out of range")))?;
        b.add_lane(id, VertexId(*from), VertexId(*to));

        let two_way = options.all_bidirectional || props.bidirectional;
        if two_way && from != to && !listed.contains(&(*to, *from)) {
            let reverse = LaneId::try_from(next_reverse)
                .map_err(|_| GraphError::Parse(format!("lane index {next_reverse} out of range")))?;
            b.add_lane(reverse, VertexId(*to), VertexId(*from));
            next_reverse += 1;
        }
    }

    let graph = b.build()?;
    info!(
        level = %level_name,
        vertices = graph.vertex_count(),
        lanes = graph.lane_count(),
        chargers = graph.charging_stations().len(),
        "loaded navigation graph"
    );
    Ok(graph)
}
