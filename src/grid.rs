use std::fmt;

use ndshape::{RuntimeShape, Shape};

use crate::{HeightSource, Neighbor, TerrainError, TerrainResult};

/// One of the four horizontal neighbors of a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// -X
    Left = 0,
    /// +X
    Right = 1,
    /// -Z
    PrevRow = 2,
    /// +Z
    NextRow = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::PrevRow,
        Direction::NextRow,
    ];

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Grid offset `[dx, dz]` to the neighbor in this direction.
    #[inline]
    pub const fn offset(&self) -> [i64; 2] {
        match self {
            Direction::Left => [-1, 0],
            Direction::Right => [1, 0],
            Direction::PrevRow => [0, -1],
            Direction::NextRow => [0, 1],
        }
    }
}

/// The authoritative height of every column in the terrain.
///
/// Grid coordinates `(x, z)` are at the same time array indices and world-space X/Z coordinates of the column centers.
/// Heights are stored densely with X varying fastest.
#[derive(Clone)]
pub struct VoxelGrid {
    shape: RuntimeShape<u32, 2>,
    heights: Vec<i32>,
}

impl fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("dims", &self.dims())
            .field("heights", &self.heights)
            .finish()
    }
}

impl VoxelGrid {
    /// A grid where every column has the same height.
    pub fn flat(width: u32, length: u32, height: i32) -> TerrainResult<Self> {
        Self::from_source(width, length, &HeightSource::Flat(height), 1.0)
    }

    /// Builds a grid by quantizing `source`. Sampled heights are scaled by `height_multiplier` and truncated toward
    /// zero.
    pub fn from_source(
        width: u32,
        length: u32,
        source: &HeightSource,
        height_multiplier: f32,
    ) -> TerrainResult<Self> {
        if width == 0 {
            return Err(TerrainError::ZeroDimension { name: "width" });
        }
        if length == 0 {
            return Err(TerrainError::ZeroDimension { name: "length" });
        }
        let shape = RuntimeShape::<u32, 2>::new([width, length]);
        let heights = source.quantize([width, length], height_multiplier)?;
        debug_assert_eq!(heights.len(), shape.size() as usize);

        Ok(Self { shape, heights })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.as_array()[0]
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.shape.as_array()[1]
    }

    /// `[width, length]`
    #[inline]
    pub fn dims(&self) -> [u32; 2] {
        self.shape.as_array()
    }

    /// All heights, X varying fastest.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    /// True if `(x, z)` names a column of this grid.
    #[inline]
    pub fn in_bounds(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && x < i64::from(self.width()) && z < i64::from(self.length())
    }

    #[inline]
    pub(crate) fn out_of_range(&self, x: i64, z: i64) -> TerrainError {
        TerrainError::OutOfRange {
            x,
            z,
            width: self.width(),
            length: self.length(),
        }
    }

    #[inline]
    fn index(&self, x: u32, z: u32) -> TerrainResult<usize> {
        if x < self.width() && z < self.length() {
            Ok(self.shape.linearize([x, z]) as usize)
        } else {
            Err(self.out_of_range(x.into(), z.into()))
        }
    }

    pub fn height(&self, x: u32, z: u32) -> TerrainResult<i32> {
        let i = self.index(x, z)?;
        Ok(self.heights[i])
    }

    /// Overwrites the height of `(x, z)` and returns the previous height.
    pub fn set_height(&mut self, x: u32, z: u32, height: i32) -> TerrainResult<i32> {
        let i = self.index(x, z)?;
        Ok(std::mem::replace(&mut self.heights[i], height))
    }

    /// Coordinates of the neighbor of `(x, z)` in `direction`, or `None` on the edge of the grid.
    ///
    /// `(x, z)` itself must be in range.
    pub fn neighbor_coords(
        &self,
        x: u32,
        z: u32,
        direction: Direction,
    ) -> TerrainResult<Option<[u32; 2]>> {
        self.index(x, z)?;
        let [dx, dz] = direction.offset();
        let (nx, nz) = (i64::from(x) + dx, i64::from(z) + dz);
        if self.in_bounds(nx, nz) {
            Ok(Some([nx as u32, nz as u32]))
        } else {
            Ok(None)
        }
    }

    /// The neighbor of `(x, z)` in `direction`, or [`Neighbor::Absent`] when it would fall outside the grid.
    pub fn neighbor(&self, x: u32, z: u32, direction: Direction) -> TerrainResult<Neighbor> {
        Ok(match self.neighbor_coords(x, z, direction)? {
            Some([nx, nz]) => {
                Neighbor::Present(self.heights[self.shape.linearize([nx, nz]) as usize])
            }
            None => Neighbor::Absent,
        })
    }
}
