//! Errors produced while building, editing, or meshing a terrain.

use std::path::PathBuf;

use thiserror::Error;

use crate::ChunkKey;

/// Errors that can occur while initializing, editing, or meshing a terrain.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// A grid or chunk dimension was zero.
    #[error("{name} must be greater than zero")]
    ZeroDimension {
        /// Which configuration field was zero.
        name: &'static str,
    },

    /// The grid is not an exact multiple of the chunk size along some axis.
    #[error("terrain {axis} {terrain} is not a multiple of chunk {axis} {chunk}")]
    NotChunkMultiple {
        /// `"width"` or `"length"`.
        axis: &'static str,
        terrain: u32,
        chunk: u32,
    },

    /// A height sample buffer does not cover the grid it is meant to fill.
    #[error("height samples are {actual:?} ({len} samples), expected {expected:?}")]
    SampleShapeMismatch {
        expected: [u32; 2],
        actual: [u32; 2],
        len: usize,
    },

    /// A configuration value could not be parsed or is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Column coordinates fall outside `[0, width) x [0, length)`.
    #[error("column ({x}, {z}) is outside the {width}x{length} grid")]
    OutOfRange { x: i64, z: i64, width: u32, length: u32 },

    /// A chunk sub-range does not lie inside the grid.
    #[error("chunk extent min={min:?} shape={shape:?} is not inside the {width}x{length} grid")]
    ChunkOutOfBounds {
        min: [u32; 2],
        shape: [u32; 2],
        width: u32,
        length: u32,
    },

    /// No chunk exists with this key.
    #[error("no chunk at {0:?}")]
    UnknownChunk(ChunkKey),

    /// A chunk would produce more vertices than the configured limit allows.
    #[error("chunk {chunk:?} needs {vertices} vertices, more than the mesh limit")]
    MeshTooLarge { chunk: ChunkKey, vertices: usize },
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
