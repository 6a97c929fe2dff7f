//! Graph-subsystem error type.

use thiserror::Error;

use fleet_core::{LaneId, VertexId};

/// Errors produced by `fleet-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    NoRoute { from: VertexId, to: VertexId },

    #[error("vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    #[error("duplicate vertex id {0}")]
    DuplicateVertex(VertexId),

    #[error("duplicate lane id {0}")]
    DuplicateLane(LaneId),

    #[error("lane {lane} references unknown vertex {vertex}")]
    DanglingLane { lane: LaneId, vertex: VertexId },

    #[error("graph definition error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
