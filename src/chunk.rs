use std::fmt;

use ilattice::glam::{UVec2, Vec3};
use ilattice::prelude::Extent;
use ndshape::{RuntimeShape, Shape};

use crate::{
    mesh_chunk, place_colliders, ColliderBox, ColumnFaceConfig, FaceFlags, MeshBuffer,
    MeshParams, TerrainConfig, TerrainResult, VoxelGrid,
};

/// Position of a chunk in the grid of chunks. Chunk `(1, 0)` covers the second block of `chunk_width` columns along X.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: u32,
    pub z: u32,
}

impl ChunkKey {
    #[inline]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }
}

/// Whether a chunk's mesh, face flags, and colliders reflect the current grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChunkState {
    Clean,
    /// The grid changed under this chunk (or a neighboring column) since it was last meshed.
    Dirty,
}

/// A fixed rectangle of columns with the mesh and colliders generated for it.
///
/// Chunks are created once when the terrain is built and remeshed in place afterwards. A chunk never owns heights;
/// those stay in the [`VoxelGrid`]. It does own the face flags of its columns, since they are a product of meshing.
#[derive(Clone)]
pub struct Chunk {
    key: ChunkKey,
    extent: Extent<UVec2>,
    shape: RuntimeShape<u32, 2>,
    state: ChunkState,
    mesh: MeshBuffer,
    face_flags: Vec<FaceFlags>,
    colliders: Vec<ColliderBox>,
    generation: u64,
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("key", &self.key)
            .field("extent", &self.extent)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("num_quads", &self.mesh.num_quads())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl Chunk {
    /// A dirty chunk with nothing meshed yet.
    pub(crate) fn new(key: ChunkKey, extent: Extent<UVec2>) -> Self {
        Self {
            key,
            extent,
            shape: RuntimeShape::<u32, 2>::new(extent.shape.to_array()),
            state: ChunkState::Dirty,
            mesh: MeshBuffer::new(),
            face_flags: Vec::new(),
            colliders: Vec::new(),
            generation: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// The columns this chunk covers.
    #[inline]
    pub fn extent(&self) -> &Extent<UVec2> {
        &self.extent
    }

    /// World position that mesh positions are relative to.
    pub fn origin(&self) -> Vec3 {
        let min = self.extent.minimum.as_vec2();
        Vec3::new(min.x, 0.0, min.y)
    }

    /// World-space center of the chunk's footprint at ground level.
    pub fn center(&self) -> Vec3 {
        let half = self.extent.shape.as_vec2() * 0.5;
        self.origin() + Vec3::new(half.x - 0.5, 0.0, half.y - 0.5)
    }

    /// True if the global column `(x, z)` belongs to this chunk.
    #[inline]
    pub fn contains(&self, x: u32, z: u32) -> bool {
        self.local(x, z).is_some()
    }

    #[inline]
    fn local(&self, x: u32, z: u32) -> Option<[u32; 2]> {
        let lx = x.checked_sub(self.extent.minimum.x)?;
        let lz = z.checked_sub(self.extent.minimum.y)?;
        (lx < self.extent.shape.x && lz < self.extent.shape.y).then(|| [lx, lz])
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.state == ChunkState::Dirty
    }

    #[inline]
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    #[inline]
    pub fn colliders(&self) -> &[ColliderBox] {
        &self.colliders
    }

    /// Number of successful remeshes so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Face flags of global column `(x, z)` from the last successful remesh. `None` if the column isn't in this chunk
    /// or the chunk has never been meshed.
    pub fn face_flags(&self, x: u32, z: u32) -> Option<FaceFlags> {
        let [lx, lz] = self.local(x, z)?;
        self.face_flags
            .get(self.shape.linearize([lx, lz]) as usize)
            .copied()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state = ChunkState::Dirty;
    }

    /// Rebuilds the mesh, face flags, and colliders from `grid`, then marks the chunk clean.
    ///
    /// On failure everything generated so far is discarded and the chunk stays dirty.
    pub(crate) fn remesh(
        &mut self,
        grid: &VoxelGrid,
        config: &TerrainConfig,
        faces: &ColumnFaceConfig,
    ) -> TerrainResult<()> {
        let params = MeshParams {
            faces,
            atlas: &config.atlas,
            floor_y: config.floor_y,
            max_vertices: config.max_chunk_vertices,
        };
        let result = mesh_chunk(
            grid,
            self.key,
            &self.extent,
            &params,
            &mut self.mesh,
            &mut self.face_flags,
        )
        .and_then(|()| {
            place_colliders(
                grid,
                &self.extent,
                &self.face_flags,
                config.collider_margin,
                &mut self.colliders,
            )
        });

        match result {
            Ok(()) => {
                self.state = ChunkState::Clean;
                self.generation += 1;
                Ok(())
            }
            Err(e) => {
                self.mesh.reset();
                self.face_flags.clear();
                self.colliders.clear();
                self.state = ChunkState::Dirty;
                Err(e)
            }
        }
    }
}
