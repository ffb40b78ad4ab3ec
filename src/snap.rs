//! Snap points where roads and other structures can attach to cliff walls.

use ilattice::glam::Vec3;

use crate::{ColumnView, TerrainMesh, TerrainResult};

/// One point per wall of `column` that faces a lower neighbor, at the middle of the wall's top edge.
pub fn snap_points(column: &ColumnView) -> Vec<Vec3> {
    let center = Vec3::new(column.x as f32, column.height as f32, column.z as f32);
    column
        .faces
        .exposed()
        .map(|direction| {
            let [dx, dz] = direction.offset();
            center + Vec3::new(dx as f32, 0.0, dz as f32) * 0.5
        })
        .collect()
}

/// The point in `points` closest to `target`. Ties go to the earliest point.
pub fn closest_point(points: &[Vec3], target: Vec3) -> Option<Vec3> {
    points.iter().copied().fold(None, |best: Option<Vec3>, p| match best {
        Some(b) if b.distance_squared(target) <= p.distance_squared(target) => Some(b),
        _ => Some(p),
    })
}

impl TerrainMesh {
    /// Snap points of column `(x, z)`, see [`snap_points`].
    pub fn snap_points(&self, x: u32, z: u32) -> TerrainResult<Vec<Vec3>> {
        Ok(snap_points(&self.column(x, z)?))
    }

    /// The snap point of column `(x, z)` closest to `target`, or `None` if the column has no cliff walls.
    pub fn closest_snap_point(&self, x: u32, z: u32, target: Vec3) -> TerrainResult<Option<Vec3>> {
        let points = self.snap_points(x, z)?;
        let closest = closest_point(&points, target);
        if closest.is_none() {
            log::debug!("column ({}, {}) has no snap points", x, z);
        }
        Ok(closest)
    }
}
