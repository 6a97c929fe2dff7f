//! The unit of mutual exclusion.

use std::fmt;

use fleet_core::{LaneId, VertexId};

/// A vertex or a lane.  Each is reserved independently.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Vertex(VertexId),
    Lane(LaneId),
}

impl From<VertexId> for Resource {
    fn from(v: VertexId) -> Self {
        Resource::Vertex(v)
    }
}

impl From<LaneId> for Resource {
    fn from(l: LaneId) -> Self {
        Resource::Lane(l)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Vertex(v) => write!(f, "vertex {v}"),
            Resource::Lane(l) => write!(f, "lane {l}"),
        }
    }
}
