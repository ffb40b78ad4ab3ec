//! Column geometry and coordinate systems.
//!
//! # Columns and Faces
//!
//! A terrain column is a stack of unit cubes standing on the grid cell
//! `(x, z)`, centered on that integer coordinate. Since the camera is always
//! above the terrain, a column never emits its bottom face, leaving at most
//! five **faces**: the top and four walls.
//!
//! ```text
//!        +Y
//!         |   NextRow (+Z)
//!         |  /
//!     O--------O
//!   / |  top / |
//! O--------O   |
//! |   |    |   |--- Right (+X)
//! |   O----|---O
//! | /      | /
//! O--------O
//!    /
//!  PrevRow (-Z)
//!
//! Fig 1: Column faces. Left (-X) is hidden behind the column.
//! ```
//!
//! Each face is rendered as one **quad**: four vertices, each with a UV
//! coordinate and the face's **normal**, and six **indices** forming two
//! triangles.
//!
//! # `{N, U, V}` Space
//!
//! Like cube faces, a column face is described in a face-local space: the
//! **N**ormal axis and two in-plane axes **U** and **V**. Walls always use
//! `V = +Y` so that the side texture stays upright, and the top face uses
//! `U = +Z`, `V = +X`. The corners of every quad come back in the same
//! `{U, V}` order, see [`ColumnFace::quad_corners`], which lets the winding
//! be derived from the sign of the normal and the parity of the axis
//! permutation instead of being written out per face.
//!
//! # Coordinate System
//!
//! Meshes are produced for a right-handed coordinate system with Y up,
//! counter-clockwise front faces:
//!
//! ```text
//!       +Y
//!       | -Z
//! -X____|/____+X
//!      /|
//!    +Z |
//!       -Y
//! ```
//!
//! Five [`ColumnFace`] definitions combine to form a [`ColumnFaceConfig`].

mod axis;
mod face;
mod quad;

pub use axis::*;
pub use face::*;
pub use quad::*;

use crate::Direction;

/// The five faces a column can emit, oriented for one coordinate system.
#[derive(Clone, Debug)]
pub struct ColumnFaceConfig {
    pub top: ColumnFace,
    /// Walls, indexed by [`Direction::index`].
    pub sides: [ColumnFace; 4],

    /// One of the two horizontal axes must be flipped in the U texel
    /// direction to avoid mirrored wall textures. For a right-handed Y-up
    /// system that's [`Axis::X`]: on the +Z wall +U points toward +X, but on
    /// the +X wall +U points toward **negative** Z.
    pub u_flip_face: Axis,
}

impl ColumnFaceConfig {
    #[inline]
    pub fn side(&self, direction: Direction) -> &ColumnFace {
        &self.sides[direction.index()]
    }
}

/// Coordinate configuration for a right-handed coordinate system with Y up.
pub const RIGHT_HANDED_Y_UP_CONFIG: ColumnFaceConfig = ColumnFaceConfig {
    top: ColumnFace::new(1, AxisPermutation::Yzx),
    sides: [
        ColumnFace::new(-1, AxisPermutation::Xzy),
        ColumnFace::new(1, AxisPermutation::Xzy),
        ColumnFace::new(-1, AxisPermutation::Zxy),
        ColumnFace::new(1, AxisPermutation::Zxy),
    ],
    u_flip_face: Axis::X,
};
