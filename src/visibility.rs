use crate::{Direction, TerrainResult, VoxelGrid};

/// What lies next to a column in some direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Neighbor {
    /// A column with this height.
    Present(i32),
    /// The edge of the grid.
    Absent,
}

/// Whether the wall of a column with `this_height` facing `neighbor` can be seen.
///
/// Walls on the edge of the grid are always visible. Otherwise a wall is only visible when this column rises above its
/// neighbor.
#[inline]
pub fn should_draw_side_face(this_height: i32, neighbor: Neighbor) -> bool {
    match neighbor {
        Neighbor::Absent => true,
        Neighbor::Present(neighbor_height) => this_height > neighbor_height,
    }
}

/// Columns have nothing above them, so the top face is always drawn.
#[inline]
pub fn should_draw_top_face(_this_height: i32) -> bool {
    true
}

/// Bottom of the visible span of a wall: the lower of the two heights, or on the grid edge `floor_y`. Edge walls of
/// columns at or below `floor_y` reach one unit down instead, so the skirt never collapses to zero height.
#[inline]
pub fn side_face_bottom(this_height: i32, neighbor: Neighbor, floor_y: f32) -> f32 {
    match neighbor {
        Neighbor::Present(neighbor_height) => this_height.min(neighbor_height) as f32,
        Neighbor::Absent => floor_y.min(this_height as f32 - 1.0),
    }
}

/// Whether a wall stands above a lower neighboring column. Walls on the grid edge are drawn but are not cliffs, so
/// they don't get face flags, colliders, or snap points.
#[inline]
pub fn is_cliff_face(this_height: i32, neighbor: Neighbor) -> bool {
    matches!(neighbor, Neighbor::Present(neighbor_height) if this_height > neighbor_height)
}

/// Which walls of a column faced a lower neighbor the last time its chunk was meshed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct FaceFlags {
    pub facing_left: bool,
    pub facing_right: bool,
    pub facing_prev_row: bool,
    pub facing_next_row: bool,
}

impl FaceFlags {
    pub const NONE: Self = Self {
        facing_left: false,
        facing_right: false,
        facing_prev_row: false,
        facing_next_row: false,
    };

    pub const ALL: Self = Self {
        facing_left: true,
        facing_right: true,
        facing_prev_row: true,
        facing_next_row: true,
    };

    #[inline]
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.facing_left,
            Direction::Right => self.facing_right,
            Direction::PrevRow => self.facing_prev_row,
            Direction::NextRow => self.facing_next_row,
        }
    }

    #[inline]
    pub fn set(&mut self, direction: Direction, exposed: bool) {
        match direction {
            Direction::Left => self.facing_left = exposed,
            Direction::Right => self.facing_right = exposed,
            Direction::PrevRow => self.facing_prev_row = exposed,
            Direction::NextRow => self.facing_next_row = exposed,
        }
    }

    /// True if at least one wall is exposed.
    #[inline]
    pub fn any(&self) -> bool {
        self.facing_left || self.facing_right || self.facing_prev_row || self.facing_next_row
    }

    pub fn count(&self) -> usize {
        Direction::ALL.into_iter().filter(|&d| self.get(d)).count()
    }

    pub fn exposed(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |&d| self.get(d))
    }
}

/// Evaluates [`is_cliff_face`] against all four neighbors of `(x, z)` in `grid`.
pub fn column_face_flags(grid: &VoxelGrid, x: u32, z: u32) -> TerrainResult<FaceFlags> {
    let height = grid.height(x, z)?;
    let mut flags = FaceFlags::NONE;
    for direction in Direction::ALL {
        flags.set(
            direction,
            is_cliff_face(height, grid.neighbor(x, z, direction)?),
        );
    }
    Ok(flags)
}
