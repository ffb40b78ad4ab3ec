use ilattice::glam::{UVec2, Vec3};
use ilattice::prelude::Extent;

use crate::{FaceFlags, TerrainResult, VoxelGrid};

/// An axis-aligned box collider in world space, ready to hand to a physics backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderBox {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl ColliderBox {
    /// The collider for the column at `(x, z)`: a one unit footprint centered on the column, standing on `y = 0` and
    /// reaching `margin` above the column's height so that objects resting against the wall register contact.
    pub fn for_column(x: u32, z: u32, height: i32, margin: f32) -> Self {
        let top = height as f32 + margin;
        let (bottom, top) = (top.min(0.0), top.max(0.0));
        Self {
            center: Vec3::new(x as f32, (bottom + top) * 0.5, z as f32),
            half_extents: Vec3::new(0.5, (top - bottom) * 0.5, 0.5),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Full vertical extent.
    #[inline]
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&point.x)
            && (min.y..=max.y).contains(&point.y)
            && (min.z..=max.z).contains(&point.z)
    }
}

/// Replaces `output` with one collider per column of `extent` that has at least one wall facing a lower neighbor.
///
/// `face_flags` must come from meshing the same extent against the same grid state, laid out X fastest.
pub fn place_colliders(
    grid: &VoxelGrid,
    extent: &Extent<UVec2>,
    face_flags: &[FaceFlags],
    margin: f32,
    output: &mut Vec<ColliderBox>,
) -> TerrainResult<()> {
    output.clear();

    let min = extent.minimum;
    let max = extent.minimum + extent.shape;
    let columns = (min.y..max.y).flat_map(|z| (min.x..max.x).map(move |x| (x, z)));
    for ((x, z), flags) in columns.zip(face_flags) {
        if flags.any() {
            output.push(ColliderBox::for_column(x, z, grid.height(x, z)?, margin));
        }
    }

    Ok(())
}
