use ilattice::glam::Vec3;

/// Either the X, Y, or Z axis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub const fn unit_vector(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// The `{N, U, V}` --> `{X, Y, Z}` mappings used by column faces.
///
/// Only the three permutations that keep Y as the V axis on walls (and put Z
/// along U on the top face) are needed, so this is a subset of all six.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AxisPermutation {
    /// Even. Normal along Z, U along X, V along Y.
    Zxy,
    /// Even. Normal along Y, U along Z, V along X.
    Yzx,
    /// Odd. Normal along X, U along Z, V along Y.
    Xzy,
}

impl AxisPermutation {
    #[inline]
    pub const fn sign(&self) -> i32 {
        match self {
            AxisPermutation::Zxy => 1,
            AxisPermutation::Yzx => 1,
            AxisPermutation::Xzy => -1,
        }
    }

    /// Returns the [`Axes`] in the order specified by the permutation.
    ///
    /// ```
    /// # use column_mesh::*;
    /// assert_eq!(AxisPermutation::Xzy.axes(), [Axis::X, Axis::Z, Axis::Y]);
    /// ```
    ///
    /// [`Axes`]: Axis
    #[inline]
    pub const fn axes(&self) -> [Axis; 3] {
        match self {
            AxisPermutation::Zxy => [Axis::Z, Axis::X, Axis::Y],
            AxisPermutation::Yzx => [Axis::Y, Axis::Z, Axis::X],
            AxisPermutation::Xzy => [Axis::X, Axis::Z, Axis::Y],
        }
    }
}
