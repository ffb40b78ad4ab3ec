use ilattice::glam::Vec3;

/// The axis-aligned region of a column that one face is cut from, without an orientation. To get the actual corners of
/// the quad, combine with a [`ColumnFace`](crate::ColumnFace).
///
/// The top face of a column uses a box with zero height sitting at the column's height; a wall uses the slab between
/// the bottom of the exposed span and the column's height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    /// The minimum corner of the box.
    pub minimum: Vec3,
    /// Extent of the box along each axis.
    pub size: Vec3,
}

impl FaceBox {
    #[inline]
    pub fn new(minimum: Vec3, size: Vec3) -> Self {
        Self { minimum, size }
    }

    /// The footprint of a column centered on `(x, z)`, spanning `bottom..top` vertically.
    #[inline]
    pub fn column_span(x: f32, z: f32, bottom: f32, top: f32) -> Self {
        Self {
            minimum: Vec3::new(x - 0.5, bottom, z - 0.5),
            size: Vec3::new(1.0, top - bottom, 1.0),
        }
    }
}
