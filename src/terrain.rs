use std::collections::BTreeSet;
use std::fmt;

use ilattice::glam::{UVec2, Vec3};
use ilattice::prelude::Extent;
use ndshape::{RuntimeShape, Shape};

use crate::{
    bounds::check_chunk_extent, Chunk, ChunkKey, ColumnFaceConfig, Direction, FaceFlags,
    HeightSource, TerrainConfig, TerrainError, TerrainResult, VoxelGrid,
    RIGHT_HANDED_Y_UP_CONFIG,
};

/// Heightmaps wider than this make for very large terrains.
const LARGE_TERRAIN_WIDTH: u32 = 256;

/// Sets the column at `(x, z)` to `height`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct HeightEdit {
    pub x: u32,
    pub z: u32,
    pub height: i32,
}

impl HeightEdit {
    #[inline]
    pub const fn new(x: u32, z: u32, height: i32) -> Self {
        Self { x, z, height }
    }
}

/// What happened to each chunk that needed remeshing.
#[derive(Debug, Default)]
pub struct RemeshReport {
    /// Chunks that were remeshed and are now clean, in key order.
    pub remeshed: Vec<ChunkKey>,
    /// Chunks that failed to remesh. They stay dirty and are retried by [`TerrainMesh::remesh_dirty`].
    pub failed: Vec<(ChunkKey, TerrainError)>,
}

impl RemeshReport {
    /// True if every dirty chunk was remeshed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// True if no chunk needed remeshing at all.
    pub fn is_noop(&self) -> bool {
        self.remeshed.is_empty() && self.failed.is_empty()
    }
}

/// Height and face flags of a single column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnView {
    pub x: u32,
    pub z: u32,
    pub height: i32,
    /// Walls facing a lower neighbor, as of the owning chunk's last remesh.
    pub faces: FaceFlags,
    pub chunk: ChunkKey,
}

/// The area that the camera may pan over and that players may build on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl MapBounds {
    pub fn from_dims([width, length]: [u32; 2]) -> Self {
        Self {
            min_x: 0.0,
            max_x: width as f32,
            min_z: 0.0,
            max_z: length as f32,
        }
    }

    /// Inclusive on every side.
    #[inline]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

/// A chunked, meshed terrain built from a grid of column heights.
///
/// Owns the [`VoxelGrid`] and every [`Chunk`]. Height edits go through [`TerrainMesh::apply_height_edits`], which
/// writes the whole batch to the grid first and then remeshes each affected chunk exactly once.
#[derive(Clone)]
pub struct TerrainMesh {
    config: TerrainConfig,
    faces: ColumnFaceConfig,
    grid: VoxelGrid,
    chunk_shape: RuntimeShape<u32, 2>,
    chunks: Vec<Chunk>,
    bounds: MapBounds,
}

impl fmt::Debug for TerrainMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainMesh")
            .field("config", &self.config)
            .field("chunks_per_axis", &self.chunk_shape.as_array())
            .field("grid", &self.grid)
            .field("chunks", &self.chunks)
            .finish_non_exhaustive()
    }
}

impl TerrainMesh {
    /// Builds the grid from `source`, partitions it into chunks, and meshes every chunk.
    ///
    /// Fails without building anything if the configuration is invalid or the height source doesn't match the grid.
    pub fn new(config: TerrainConfig, source: &HeightSource) -> TerrainResult<Self> {
        Self::with_faces(config, source, RIGHT_HANDED_Y_UP_CONFIG)
    }

    /// Like [`TerrainMesh::new`], with faces oriented for a different coordinate system.
    pub fn with_faces(
        config: TerrainConfig,
        source: &HeightSource,
        faces: ColumnFaceConfig,
    ) -> TerrainResult<Self> {
        config.validate()?;
        if config.width > LARGE_TERRAIN_WIDTH {
            log::warn!(
                "terrain is {} columns wide; meshing and remeshing will be slow",
                config.width
            );
        }

        let grid = VoxelGrid::from_source(
            config.width,
            config.length,
            source,
            config.height_multiplier,
        )?;

        let chunks_per_axis = config.chunks_per_axis();
        let chunk_shape = RuntimeShape::<u32, 2>::new(chunks_per_axis);
        let chunk_dims = UVec2::new(config.chunk_width, config.chunk_length);
        let mut chunks = Vec::with_capacity(chunk_shape.size() as usize);
        for i in 0..chunk_shape.size() {
            let [cx, cz] = chunk_shape.delinearize(i);
            let extent = Extent::from_min_and_shape(UVec2::new(cx, cz) * chunk_dims, chunk_dims);
            check_chunk_extent(grid.dims(), &extent)?;
            chunks.push(Chunk::new(ChunkKey::new(cx, cz), extent));
        }

        let bounds = MapBounds::from_dims(grid.dims());
        let mut terrain = Self {
            config,
            faces,
            grid,
            chunk_shape,
            chunks,
            bounds,
        };

        // Every chunk starts dirty.
        let report = terrain.remesh_dirty();
        if let Some((_, e)) = report.failed.into_iter().next() {
            return Err(e);
        }

        log::info!(
            "built {}x{} terrain: {} chunks of {}x{}, {} quads, {} colliders",
            terrain.config.width,
            terrain.config.length,
            terrain.chunks.len(),
            terrain.config.chunk_width,
            terrain.config.chunk_length,
            terrain.chunks.iter().map(|c| c.mesh().num_quads()).sum::<usize>(),
            terrain.chunks.iter().map(|c| c.colliders().len()).sum::<usize>(),
        );

        Ok(terrain)
    }

    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Read-only access to the heights. Edits must go through [`TerrainMesh::apply_height_edits`].
    #[inline]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    #[inline]
    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn chunk(&self, key: ChunkKey) -> TerrainResult<&Chunk> {
        let i = self.chunk_index(key)?;
        Ok(&self.chunks[i])
    }

    /// Keys of chunks that are currently dirty, in key order.
    pub fn dirty_chunks(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self
            .chunks
            .iter()
            .filter(|c| c.is_dirty())
            .map(Chunk::key)
            .collect();
        keys.sort();
        keys
    }

    fn chunk_index(&self, key: ChunkKey) -> TerrainResult<usize> {
        let [cx, cz] = self.chunk_shape.as_array();
        if key.x < cx && key.z < cz {
            Ok(self.chunk_shape.linearize([key.x, key.z]) as usize)
        } else {
            Err(TerrainError::UnknownChunk(key))
        }
    }

    /// The chunk that owns column `(x, z)`.
    pub fn chunk_key_of(&self, x: u32, z: u32) -> TerrainResult<ChunkKey> {
        if !self.grid.in_bounds(x.into(), z.into()) {
            return Err(self.grid.out_of_range(x.into(), z.into()));
        }
        Ok(ChunkKey::new(
            x / self.config.chunk_width,
            z / self.config.chunk_length,
        ))
    }

    pub fn height(&self, x: u32, z: u32) -> TerrainResult<i32> {
        self.grid.height(x, z)
    }

    /// Height and face flags of column `(x, z)`.
    pub fn column(&self, x: u32, z: u32) -> TerrainResult<ColumnView> {
        let height = self.grid.height(x, z)?;
        let key = self.chunk_key_of(x, z)?;
        let faces = self.chunk(key)?.face_flags(x, z).unwrap_or_default();
        Ok(ColumnView {
            x,
            z,
            height,
            faces,
            chunk: key,
        })
    }

    /// True if the world-space point `(x, z)` lies within the map bounds.
    #[inline]
    pub fn position_in_bounds(&self, x: f32, z: f32) -> bool {
        self.bounds.contains(x, z)
    }

    /// The column under a world-space position. Coordinates are truncated toward zero, so callers should round to the
    /// column they mean first.
    pub fn column_at(&self, position: Vec3) -> Option<[u32; 2]> {
        let (x, z) = (position.x.trunc(), position.z.trunc());
        if !(x.is_finite() && z.is_finite()) {
            return None;
        }
        let (x, z) = (x as i64, z as i64);
        self.grid.in_bounds(x, z).then(|| [x as u32, z as u32])
    }

    /// Applies a batch of height edits, then remeshes every affected chunk once.
    ///
    /// The whole batch is rejected with [`TerrainError::OutOfRange`] before anything is written if any edit is outside
    /// the grid. Edits that don't change a height are ignored. For the rest, the chunk owning the column is marked
    /// dirty along with any other chunk owning one of its four neighbors, since those neighbors' walls depend on this
    /// height. Later edits to the same column win.
    ///
    /// Remesh failures don't abort the batch: the grid already holds the final heights, and failed chunks are listed
    /// in the report and stay dirty.
    pub fn apply_height_edits(
        &mut self,
        edits: impl IntoIterator<Item = HeightEdit>,
    ) -> TerrainResult<RemeshReport> {
        let edits: Vec<HeightEdit> = edits.into_iter().collect();
        if let Some(edit) = edits.iter().find(|e| !self.grid.in_bounds(e.x.into(), e.z.into())) {
            return Err(self.grid.out_of_range(edit.x.into(), edit.z.into()));
        }

        let mut dirty = BTreeSet::new();
        for edit in &edits {
            let previous = self.grid.set_height(edit.x, edit.z, edit.height)?;
            if previous == edit.height {
                log::trace!("column ({}, {}) unchanged", edit.x, edit.z);
                continue;
            }

            let key = self.chunk_key_of(edit.x, edit.z)?;
            dirty.insert(key);
            for direction in Direction::ALL {
                if let Some([nx, nz]) = self.grid.neighbor_coords(edit.x, edit.z, direction)? {
                    let neighbor_key = self.chunk_key_of(nx, nz)?;
                    if neighbor_key != key {
                        dirty.insert(neighbor_key);
                    }
                }
            }
        }

        for &key in &dirty {
            let i = self.chunk_index(key)?;
            self.chunks[i].mark_dirty();
        }

        Ok(self.remesh_dirty())
    }

    /// Sets every column under `positions` to `height` as one batch. Positions outside the map are skipped.
    pub fn assign_height(
        &mut self,
        positions: &[Vec3],
        height: i32,
    ) -> TerrainResult<RemeshReport> {
        let edits: Vec<HeightEdit> = positions
            .iter()
            .filter_map(|&p| self.column_at(p))
            .map(|[x, z]| HeightEdit::new(x, z, height))
            .collect();
        self.apply_height_edits(edits)
    }

    /// Remeshes every dirty chunk, in key order. Chunks that fail stay dirty.
    pub fn remesh_dirty(&mut self) -> RemeshReport {
        let mut report = RemeshReport::default();
        let Self {
            config,
            faces,
            grid,
            chunks,
            ..
        } = self;

        let mut dirty: Vec<&mut Chunk> = chunks.iter_mut().filter(|c| c.is_dirty()).collect();
        dirty.sort_by_key(|c| c.key());
        for chunk in dirty {
            let key = chunk.key();
            match chunk.remesh(grid, config, faces) {
                Ok(()) => {
                    if config.debug_remesh {
                        log::info!("remeshed chunk {:?} centered at {}", key, chunk.center());
                    } else {
                        log::debug!("remeshed chunk {:?} centered at {}", key, chunk.center());
                    }
                    report.remeshed.push(key);
                }
                Err(e) => {
                    log::warn!("failed to remesh chunk {:?}: {}", key, e);
                    report.failed.push((key, e));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeightSamples;

    fn flat_terrain(width: u32, length: u32, chunk_width: u32, chunk_length: u32) -> TerrainMesh {
        TerrainMesh::new(
            TerrainConfig::new(width, length, chunk_width, chunk_length),
            &HeightSource::Flat(0),
        )
        .unwrap()
    }

    #[test]
    fn initialization_meshes_every_chunk() {
        let terrain = flat_terrain(8, 4, 4, 2);
        assert_eq!(terrain.chunks().count(), 4);
        assert!(terrain.dirty_chunks().is_empty());
        for chunk in terrain.chunks() {
            assert_eq!(chunk.generation(), 1);
            assert!(chunk.mesh().is_well_formed());
            assert!(chunk.mesh().num_quads() >= 8);
        }
    }

    #[test]
    fn bad_config_builds_nothing() {
        let config = TerrainConfig::new(10, 8, 4, 4);
        let err = TerrainMesh::new(config, &HeightSource::Flat(0)).unwrap_err();
        assert!(matches!(err, TerrainError::NotChunkMultiple { .. }));

        let samples = HeightSamples::from_fn(4, 4, |_, _| 0.0).unwrap();
        let config = TerrainConfig::new(8, 8, 4, 4);
        let err = TerrainMesh::new(config, &HeightSource::Samples(samples)).unwrap_err();
        assert!(matches!(err, TerrainError::SampleShapeMismatch { .. }));
    }

    #[test]
    fn chunk_keys_follow_chunk_size() {
        let terrain = flat_terrain(8, 8, 4, 2);
        assert_eq!(terrain.chunk_key_of(0, 0).unwrap(), ChunkKey::new(0, 0));
        assert_eq!(terrain.chunk_key_of(5, 3).unwrap(), ChunkKey::new(1, 1));
        assert_eq!(terrain.chunk_key_of(7, 7).unwrap(), ChunkKey::new(1, 3));
        assert!(terrain.chunk_key_of(8, 0).is_err());
        assert!(matches!(
            terrain.chunk(ChunkKey::new(2, 0)),
            Err(TerrainError::UnknownChunk(_))
        ));
        let chunk = terrain.chunk(ChunkKey::new(1, 1)).unwrap();
        assert!(chunk.contains(5, 3));
    }

    #[test]
    fn unchanged_height_is_a_noop() {
        let mut terrain = flat_terrain(4, 4, 2, 2);
        let report = terrain.apply_height_edits([HeightEdit::new(1, 1, 0)]).unwrap();
        assert!(report.is_noop());
        assert!(terrain.dirty_chunks().is_empty());
        assert!(terrain.chunks().all(|c| c.generation() == 1));
    }

    #[test]
    fn interior_edit_only_remeshes_its_chunk() {
        let mut terrain = flat_terrain(8, 8, 4, 4);
        let report = terrain.apply_height_edits([HeightEdit::new(1, 1, 2)]).unwrap();
        assert_eq!(report.remeshed, vec![ChunkKey::new(0, 0)]);
        assert!(report.is_complete());
    }

    #[test]
    fn corner_edit_remeshes_both_neighbors() {
        let mut terrain = flat_terrain(8, 8, 4, 4);
        let report = terrain.apply_height_edits([HeightEdit::new(3, 3, 2)]).unwrap();
        assert_eq!(
            report.remeshed,
            vec![ChunkKey::new(0, 0), ChunkKey::new(0, 1), ChunkKey::new(1, 0)]
        );
        // The diagonal chunk doesn't share a wall with (3, 3).
        assert_eq!(terrain.chunk(ChunkKey::new(1, 1)).unwrap().generation(), 1);
    }

    #[test]
    fn batch_remeshes_each_chunk_once() {
        let mut terrain = flat_terrain(8, 4, 4, 4);
        let edits = (0..4).flat_map(|z| (2..6).map(move |x| HeightEdit::new(x, z, 3)));
        let report = terrain.apply_height_edits(edits).unwrap();
        assert_eq!(
            report.remeshed,
            vec![ChunkKey::new(0, 0), ChunkKey::new(1, 0)]
        );
        assert!(terrain.chunks().all(|c| c.generation() == 2));
    }

    #[test]
    fn out_of_range_edit_rejects_whole_batch() {
        let mut terrain = flat_terrain(4, 4, 2, 2);
        let err = terrain
            .apply_height_edits([HeightEdit::new(0, 0, 5), HeightEdit::new(4, 0, 5)])
            .unwrap_err();
        assert!(matches!(err, TerrainError::OutOfRange { x: 4, z: 0, .. }));
        assert_eq!(terrain.height(0, 0).unwrap(), 0);
        assert!(terrain.dirty_chunks().is_empty());
    }

    #[test]
    fn last_edit_to_a_column_wins() {
        let mut terrain = flat_terrain(4, 4, 2, 2);
        terrain
            .apply_height_edits([HeightEdit::new(1, 1, 5), HeightEdit::new(1, 1, 2)])
            .unwrap();
        assert_eq!(terrain.height(1, 1).unwrap(), 2);
        assert_eq!(terrain.column(1, 1).unwrap().faces, FaceFlags::ALL);
    }

    #[test]
    fn oversized_chunk_fails_alone_and_is_retried() {
        let mut terrain = flat_terrain(4, 2, 2, 2);
        let (a, b) = (ChunkKey::new(0, 0), ChunkKey::new(1, 0));
        // Flat chunk A needs 40 vertices; B needs 52 once (2, 0) is raised.
        terrain.config.max_chunk_vertices = 44;

        let report = terrain.apply_height_edits([HeightEdit::new(2, 0, 5)]).unwrap();

        assert_eq!(report.remeshed, vec![a]);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0],
            (key, TerrainError::MeshTooLarge { vertices: 52, .. }) if key == b
        ));
        assert!(!report.is_complete());

        // The grid keeps the edit even though B couldn't be meshed.
        assert_eq!(terrain.height(2, 0).unwrap(), 5);
        assert_eq!(terrain.dirty_chunks(), vec![b]);
        let chunk_b = terrain.chunk(b).unwrap();
        assert!(chunk_b.mesh().is_empty());
        assert!(chunk_b.colliders().is_empty());
        assert_eq!(terrain.column(2, 0).unwrap().faces, FaceFlags::NONE);
        assert_eq!(terrain.chunk(a).unwrap().generation(), 2);

        terrain.config.max_chunk_vertices = crate::MAX_CHUNK_VERTICES;
        let report = terrain.remesh_dirty();
        assert_eq!(report.remeshed, vec![b]);
        assert!(report.is_complete());
        assert!(terrain.dirty_chunks().is_empty());

        let chunk_b = terrain.chunk(b).unwrap();
        assert_eq!(chunk_b.generation(), 2);
        assert_eq!(chunk_b.mesh().num_vertices(), 52);
        assert_eq!(chunk_b.colliders().len(), 1);
        let faces = terrain.column(2, 0).unwrap().faces;
        assert_eq!(faces.count(), 3);
        assert!(!faces.facing_prev_row);
        assert_eq!(terrain.chunk(a).unwrap().generation(), 2);
    }

    #[test]
    fn initialization_fails_if_a_chunk_is_too_large() {
        let config = TerrainConfig {
            max_chunk_vertices: 8,
            ..TerrainConfig::new(4, 4, 2, 2)
        };
        let err = TerrainMesh::new(config, &HeightSource::Flat(0)).unwrap_err();
        assert!(matches!(err, TerrainError::MeshTooLarge { .. }));
    }

    #[test]
    fn debug_lists_chunks_without_the_shape() {
        let text = format!("{:?}", flat_terrain(4, 2, 2, 2));
        assert!(text.starts_with("TerrainMesh { config: TerrainConfig {"));
        assert!(text.contains("chunks_per_axis: [2, 1]"));
        assert!(text.contains("Chunk { key: ChunkKey { x: 1, z: 0 }"));
        assert!(text.ends_with(", .. }"));
    }

    #[test]
    fn bounds_follow_grid_dims() {
        let terrain = flat_terrain(8, 4, 4, 4);
        assert!(terrain.position_in_bounds(0.0, 0.0));
        assert!(terrain.position_in_bounds(8.0, 4.0));
        assert!(terrain.position_in_bounds(3.7, 2.2));
        assert!(!terrain.position_in_bounds(-0.1, 2.0));
        assert!(!terrain.position_in_bounds(3.0, 4.5));
    }

    #[test]
    fn column_at_truncates_positions() {
        let terrain = flat_terrain(4, 4, 2, 2);
        assert_eq!(terrain.column_at(Vec3::new(2.9, 7.0, 1.2)), Some([2, 1]));
        assert_eq!(terrain.column_at(Vec3::new(-0.5, 0.0, 0.0)), Some([0, 0]));
        assert_eq!(terrain.column_at(Vec3::new(4.0, 0.0, 0.0)), None);
        assert_eq!(terrain.column_at(Vec3::new(f32::NAN, 0.0, 0.0)), None);
    }

    #[test]
    fn assign_height_skips_positions_off_the_map() {
        let mut terrain = flat_terrain(4, 4, 2, 2);
        let report = terrain
            .assign_height(&[Vec3::new(1.0, 0.0, 1.0), Vec3::new(9.0, 0.0, 1.0)], 3)
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(terrain.height(1, 1).unwrap(), 3);
    }
}
