use crate::{
    bounds::check_chunk_extent, is_cliff_face, should_draw_side_face, should_draw_top_face,
    side_face_bottom, AtlasConfig, ChunkKey, ColumnFaceConfig, Direction, FaceBox, FaceFlags,
    MeshBuffer, TerrainError, TerrainResult, VoxelGrid,
};

use ilattice::glam::UVec2;
use ilattice::prelude::Extent;

/// Largest vertex count a `u32` index buffer can address without an index wrapping around.
pub const MAX_CHUNK_VERTICES: usize = u32::MAX as usize;

/// Everything besides the grid that decides what a chunk mesh looks like.
#[derive(Clone, Copy)]
pub struct MeshParams<'a> {
    pub faces: &'a ColumnFaceConfig,
    pub atlas: &'a AtlasConfig,
    /// Bottom of walls on the edge of the grid.
    pub floor_y: f32,
    /// Meshing fails with [`TerrainError::MeshTooLarge`] rather than emit more vertices than this.
    pub max_vertices: usize,
}

impl<'a> MeshParams<'a> {
    pub fn new(
        faces: &'a ColumnFaceConfig,
        atlas: &'a AtlasConfig,
        floor_y: f32,
    ) -> Self {
        Self {
            faces,
            atlas,
            floor_y,
            max_vertices: MAX_CHUNK_VERTICES,
        }
    }
}

/// Builds the mesh for the columns in `extent`, one quad per visible face.
///
/// Every column emits its top face. Each wall is tested with [`should_draw_side_face`] against the neighbor in the
/// global `grid`, so walls along chunk borders are resolved with the neighboring chunk's heights even though each chunk
/// is meshed on its own. A drawn wall spans from the lower of the two heights (or the skirt bottom, see
/// [`side_face_bottom`], on the grid edge) up to the column's height.
///
/// `output` is cleared first. Positions are relative to `extent.minimum`, with column centers on integer coordinates.
/// `face_flags` is refilled with one entry per column, X varying fastest.
///
/// Fails with [`TerrainError::MeshTooLarge`] as soon as a column would push the vertex count past
/// `params.max_vertices`, leaving `output` partially filled.
pub fn mesh_chunk(
    grid: &VoxelGrid,
    key: ChunkKey,
    extent: &Extent<UVec2>,
    params: &MeshParams,
    output: &mut MeshBuffer,
    face_flags: &mut Vec<FaceFlags>,
) -> TerrainResult<()> {
    debug_assert!(check_chunk_extent(grid.dims(), extent).is_ok());

    output.reset();
    face_flags.clear();

    let min = extent.minimum;
    let max = extent.minimum + extent.shape;
    let u_flip_face = params.faces.u_flip_face;

    for z in min.y..max.y {
        for x in min.x..max.x {
            let height = grid.height(x, z)?;
            let neighbors = [
                grid.neighbor(x, z, Direction::Left)?,
                grid.neighbor(x, z, Direction::Right)?,
                grid.neighbor(x, z, Direction::PrevRow)?,
                grid.neighbor(x, z, Direction::NextRow)?,
            ];

            let num_quads = usize::from(should_draw_top_face(height))
                + neighbors
                    .iter()
                    .filter(|&&n| should_draw_side_face(height, n))
                    .count();
            let vertices = output.num_vertices() + 4 * num_quads;
            if vertices > params.max_vertices {
                return Err(TerrainError::MeshTooLarge {
                    chunk: key,
                    vertices,
                });
            }

            let top = height as f32;
            let (lx, lz) = ((x - min.x) as f32, (z - min.y) as f32);

            if should_draw_top_face(height) {
                output.push_quad(
                    &params.faces.top,
                    &FaceBox::column_span(lx, lz, top, top),
                    u_flip_face,
                    &params.atlas.top,
                );
            }

            let mut flags = FaceFlags::NONE;
            for (direction, neighbor) in Direction::ALL.into_iter().zip(neighbors) {
                if !should_draw_side_face(height, neighbor) {
                    continue;
                }
                let bottom = side_face_bottom(height, neighbor, params.floor_y);
                output.push_quad(
                    params.faces.side(direction),
                    &FaceBox::column_span(lx, lz, bottom, top),
                    u_flip_face,
                    &params.atlas.side,
                );
                flags.set(direction, is_cliff_face(height, neighbor));
            }
            face_flags.push(flags);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RIGHT_HANDED_Y_UP_CONFIG;
    use ilattice::glam::Vec3;

    fn mesh_whole_grid(grid: &VoxelGrid, floor_y: f32) -> (MeshBuffer, Vec<FaceFlags>) {
        let atlas = AtlasConfig::default();
        let params = MeshParams::new(&RIGHT_HANDED_Y_UP_CONFIG, &atlas, floor_y);
        let extent = Extent::from_min_and_shape(UVec2::ZERO, UVec2::from(grid.dims()));
        let mut mesh = MeshBuffer::new();
        let mut flags = Vec::new();
        let key = ChunkKey::new(0, 0);
        mesh_chunk(grid, key, &extent, &params, &mut mesh, &mut flags).unwrap();
        (mesh, flags)
    }

    #[test]
    fn single_column_emits_top_and_four_walls() {
        let grid = VoxelGrid::flat(1, 1, 2).unwrap();
        let (mesh, flags) = mesh_whole_grid(&grid, -1.0);

        assert_eq!(mesh.num_quads(), 5);
        assert!(mesh.is_well_formed());
        // Edge walls are drawn but they are not cliffs.
        assert_eq!(flags, vec![FaceFlags::NONE]);

        let ys: Vec<f32> = mesh.positions.iter().map(|p| p[1]).collect();
        assert!(ys.iter().all(|&y| y == 2.0 || y == -1.0));
        assert_eq!(&ys[..4], &[2.0; 4]);
    }

    #[test]
    fn flat_interior_only_has_tops_and_skirt() {
        let grid = VoxelGrid::flat(3, 3, 0).unwrap();
        let (mesh, flags) = mesh_whole_grid(&grid, -1.0);

        // 9 tops plus 3 edge walls per side of the grid.
        assert_eq!(mesh.num_quads(), 9 + 12);
        assert!(flags.iter().all(|f| !f.any()));
    }

    #[test]
    fn walls_span_down_to_the_lower_neighbor() {
        let mut grid = VoxelGrid::flat(3, 1, 1).unwrap();
        grid.set_height(1, 0, 4).unwrap();
        let (mesh, flags) = mesh_whole_grid(&grid, -1.0);

        assert_eq!(
            flags[1],
            FaceFlags {
                facing_left: true,
                facing_right: true,
                ..FaceFlags::NONE
            }
        );

        // The +X wall of the middle column sits on the plane x = 1.5 and spans y in [1, 4].
        let wall: Vec<[f32; 3]> = mesh
            .positions
            .iter()
            .copied()
            .filter(|p| p[0] == 1.5 && p[1] != -1.0)
            .collect();
        assert!(!wall.is_empty());
        let min_y = wall.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
        let max_y = wall.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_y, max_y), (1.0, 4.0));
    }

    #[test]
    fn positions_are_chunk_relative() {
        let mut grid = VoxelGrid::flat(4, 2, 0).unwrap();
        grid.set_height(2, 0, 1).unwrap();
        let atlas = AtlasConfig::default();
        let params = MeshParams::new(&RIGHT_HANDED_Y_UP_CONFIG, &atlas, -1.0);
        let extent = Extent::from_min_and_shape(UVec2::new(2, 0), UVec2::new(2, 2));
        let mut mesh = MeshBuffer::new();
        let mut flags = Vec::new();
        let key = ChunkKey::new(1, 0);
        mesh_chunk(&grid, key, &extent, &params, &mut mesh, &mut flags).unwrap();

        // The first quad is the top of global column (2, 0), which is local column (0, 0).
        let xs: Vec<f32> = mesh.positions[..4].iter().map(|p| p[0]).collect();
        assert!(xs.iter().all(|&x| x == -0.5 || x == 0.5));
        assert!(mesh.positions[..4].iter().all(|p| p[1] == 1.0));
        assert_eq!(flags.len(), 4);
        assert!(flags[0].facing_left);
        assert!(flags[0].facing_right);
    }

    #[test]
    fn vertex_limit_is_exact() {
        let grid = VoxelGrid::flat(1, 1, 2).unwrap();
        let atlas = AtlasConfig::default();
        let extent = Extent::from_min_and_shape(UVec2::ZERO, UVec2::ONE);
        let mut mesh = MeshBuffer::new();
        let mut flags = Vec::new();
        let key = ChunkKey::new(0, 0);

        let mut params = MeshParams::new(&RIGHT_HANDED_Y_UP_CONFIG, &atlas, -1.0);
        params.max_vertices = 20;
        mesh_chunk(&grid, key, &extent, &params, &mut mesh, &mut flags).unwrap();
        assert_eq!(mesh.num_vertices(), 20);

        params.max_vertices = 19;
        let err = mesh_chunk(&grid, key, &extent, &params, &mut mesh, &mut flags).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::MeshTooLarge { vertices: 20, .. }
        ));
    }

    #[test]
    fn skirt_keeps_height_below_the_floor() {
        let grid = VoxelGrid::flat(2, 2, -1).unwrap();
        let (mesh, _) = mesh_whole_grid(&grid, -1.0);

        assert_eq!(mesh.num_quads(), 4 + 8);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.positions[i as usize]));
            assert!((b - a).cross(c - a).length_squared() > 0.0);
        }
        let min_y = mesh.positions.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
        assert_eq!(min_y, -2.0);
    }

    #[test]
    fn top_faces_use_the_top_tile() {
        let grid = VoxelGrid::flat(2, 2, 0).unwrap();
        let (mesh, _) = mesh_whole_grid(&grid, -1.0);
        let tile = AtlasConfig::default().top;
        for uv in &mesh.uvs[..4] {
            assert!(uv[0] == tile.min[0] || uv[0] == tile.max[0]);
            assert!(uv[1] == tile.min[1] || uv[1] == tile.max[1]);
        }
    }
}
