use crate::{AtlasTile, Axis, AxisPermutation, FaceBox};

use ilattice::glam::Vec3;

/// Metadata that's used to aid in the geometric calculations for one of the 5 faces a column can emit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnFace {
    /// Determines the orientation of the plane.
    pub(crate) n_sign: i32,

    /// Determines the {N, U, V} <--> {X, Y, Z} relation.
    pub(crate) permutation: AxisPermutation,

    /// First in the `permutation` of +X, +Y, and +Z.
    pub(crate) n: Vec3,
    /// Second in the `permutation` of +X, +Y, and +Z.
    pub(crate) u: Vec3,
    /// Third in the `permutation` of +X, +Y, and +Z.
    pub(crate) v: Vec3,
}

impl ColumnFace {
    pub const fn new(n_sign: i32, permutation: AxisPermutation) -> Self {
        let [n_axis, u_axis, v_axis] = permutation.axes();

        Self {
            n_sign,
            permutation,
            n: n_axis.unit_vector(),
            u: u_axis.unit_vector(),
            v: v_axis.unit_vector(),
        }
    }

    #[inline]
    pub fn signed_normal(&self) -> Vec3 {
        self.n * self.n_sign as f32
    }

    /// Returns the 4 corners of the face of `face_box` that this face points out of, in this order:
    ///
    /// ```text
    ///         2 ----> 3
    ///           ^
    ///     ^       \
    ///     |         \
    ///  +V |   0 ----> 1
    ///     |
    ///      -------->
    ///        +U
    ///
    /// (+N pointing out of the screen)
    /// ```
    #[inline]
    pub fn quad_corners(&self, face_box: &FaceBox) -> [Vec3; 4] {
        let w_vec = self.u * face_box.size;
        let h_vec = self.v * face_box.size;

        let minu_minv = if self.n_sign > 0 {
            face_box.minimum + self.n * face_box.size
        } else {
            face_box.minimum
        };
        let maxu_minv = minu_minv + w_vec;
        let minu_maxv = minu_minv + h_vec;
        let maxu_maxv = minu_minv + w_vec + h_vec;

        [minu_minv, maxu_minv, minu_maxv, maxu_maxv]
    }

    #[inline]
    pub fn quad_mesh_positions(&self, face_box: &FaceBox) -> [[f32; 3]; 4] {
        self.quad_corners(face_box).map(|c| c.to_array())
    }

    #[inline]
    pub fn quad_mesh_normals(&self) -> [[f32; 3]; 4] {
        [self.signed_normal().to_array(); 4]
    }

    /// Returns the 6 vertex indices for the quad in order to make two triangles
    /// in a mesh. Winding order depends on both the sign of the surface normal
    /// and the permutation of the UVs.
    ///
    /// Front faces will be wound counterclockwise, and back faces clockwise, as
    /// per convention.
    #[inline]
    pub fn quad_mesh_indices(&self, start: u32) -> [u32; 6] {
        quad_indices(start, self.n_sign * self.permutation.sign() > 0)
    }

    /// Returns the UV coordinates of the 4 corners of the quad, stretching `tile` over the whole face regardless of
    /// its size. Vertices are in the same order as [`ColumnFace::quad_corners`].
    ///
    /// `u_flip_face` should correspond to the field on
    /// [`ColumnFaceConfig`](crate::ColumnFaceConfig) and keeps textures from
    /// being mirrored on half of the walls.
    #[inline]
    pub fn tex_coords(&self, u_flip_face: Axis, tile: &AtlasTile) -> [[f32; 2]; 4] {
        let face_normal_axis = self.permutation.axes()[0];
        let flip_u = if self.n_sign < 0 {
            u_flip_face != face_normal_axis
        } else {
            u_flip_face == face_normal_axis
        };

        let [u0, v0] = tile.min;
        let [u1, v1] = tile.max;
        if flip_u {
            [[u1, v0], [u0, v0], [u1, v1], [u0, v1]]
        } else {
            [[u0, v0], [u1, v0], [u0, v1], [u1, v1]]
        }
    }
}

/// Returns the vertex indices for a single quad (two triangles). The triangles
/// may have either clockwise or counter-clockwise winding. `start` is the first
/// index.
fn quad_indices(start: u32, counter_clockwise: bool) -> [u32; 6] {
    if counter_clockwise {
        [start, start + 1, start + 2, start + 1, start + 3, start + 2]
    } else {
        [start, start + 2, start + 1, start + 1, start + 2, start + 3]
    }
}
