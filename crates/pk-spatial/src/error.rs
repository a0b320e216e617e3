//! Spatial-subsystem error type.

use thiserror::Error;

use pk_core::{GridPos, NodeId};

/// Errors produced by `pk-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("tile {0} is outside the grid")]
    OutOfBounds(GridPos),

    #[error("node {0} not found in lane graph")]
    NodeNotFound(NodeId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
