//! Chunked voxel terrain meshes from a heightmap of integer column heights.
//!
//! The terrain is a grid of columns, each a stack of unit cubes standing on
//! the cell `(x, z)`. The grid is split into equally sized chunks, and each
//! chunk gets its own triangle mesh and set of box colliders:
//!
//! - [`VoxelGrid`] holds the height of every column.
//! - [`should_draw_side_face`] decides which walls are visible. Walls hidden
//!   behind an equal or taller neighbor are culled, and the top of a column is
//!   always drawn.
//! - [`mesh_chunk`] turns the columns of one chunk into a [`MeshBuffer`] of
//!   positions, normals, UVs, and indices, looking up neighbors in the global
//!   grid so that chunk borders stay seamless.
//! - [`place_colliders`] puts a [`ColliderBox`] on every column with a cliff
//!   wall.
//! - [`TerrainMesh`] ties it together. It applies batches of height edits and
//!   remeshes only the chunks whose geometry could have changed, including
//!   neighboring chunks whose border walls depend on an edited column.
//!
//! Everything is plain data; uploading meshes and colliders to a renderer or
//! physics engine is up to the caller.
//!
//! # Example Code
//!
//! ```
//! use column_mesh::{ChunkKey, HeightEdit, HeightSource, TerrainConfig, TerrainMesh};
//!
//! let config = TerrainConfig::new(32, 32, 16, 16);
//! let mut terrain = TerrainMesh::new(config, &HeightSource::Flat(0)).unwrap();
//!
//! // Raise a 2x2 plateau straddling the border between chunks (0, 0) and (1, 0).
//! let edits = [(15, 4), (16, 4), (15, 5), (16, 5)].map(|(x, z)| HeightEdit::new(x, z, 3));
//! let report = terrain.apply_height_edits(edits).unwrap();
//! assert_eq!(report.remeshed, vec![ChunkKey::new(0, 0), ChunkKey::new(1, 0)]);
//!
//! let column = terrain.column(15, 4).unwrap();
//! assert!(column.faces.facing_left && column.faces.facing_prev_row);
//! assert!(!column.faces.facing_right);
//!
//! for chunk in terrain.chunks() {
//!     // Positions are relative to `chunk.origin()`.
//!     assert!(chunk.mesh().is_well_formed());
//! }
//! let plateau = terrain.chunk(ChunkKey::new(0, 0)).unwrap();
//! assert_eq!(plateau.colliders().len(), 2);
//! ```

mod bounds;
mod buffer;
mod chunk;
mod collider;
mod config;
mod error;
pub mod geometry;
mod grid;
mod heightmap;
mod mesher;
pub mod snap;
mod terrain;
mod visibility;

pub use buffer::*;
pub use chunk::*;
pub use collider::*;
pub use config::*;
pub use error::*;
#[doc(inline)]
pub use geometry::*;
pub use grid::*;
pub use heightmap::*;
pub use mesher::*;
pub use terrain::*;
pub use visibility::*;

pub use ilattice;
pub use ndshape;
