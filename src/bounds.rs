use ilattice::glam::UVec2;
use ilattice::prelude::Extent;

use crate::{TerrainError, TerrainResult};

/// Checks that a chunk's column range is non-empty and lies entirely inside a grid of `grid_dims`.
pub fn check_chunk_extent(grid_dims: [u32; 2], extent: &Extent<UVec2>) -> TerrainResult<()> {
    let [width, length] = grid_dims;
    let out_of_bounds = || TerrainError::ChunkOutOfBounds {
        min: extent.minimum.to_array(),
        shape: extent.shape.to_array(),
        width,
        length,
    };

    let grid_extent = Extent::from_min_and_shape(UVec2::ZERO, UVec2::from(grid_dims));
    grid_extent
        .check_positive_shape()
        .ok_or_else(out_of_bounds)?;
    extent
        .check_positive_shape()
        .ok_or_else(out_of_bounds)?;
    if !extent.is_subset_of(&grid_extent) {
        return Err(out_of_bounds());
    }
    Ok(())
}
