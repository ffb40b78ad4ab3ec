use crate::{AtlasTile, Axis, ColumnFace, FaceBox};

/// Vertex, index, and UV data for one chunk, ready to be uploaded to a renderer.
///
/// Positions are relative to the chunk's origin. The buffer is cleared and refilled in place whenever the chunk is
/// remeshed, so it can be reused without reallocating.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<[f32; 3]>,
    /// Flat normals, one per vertex.
    pub normals: Vec<[f32; 3]>,
    /// One per vertex, in the same order as `positions`.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list.
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the buffer.
    pub fn reset(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Every face is a quad, so this is the number of faces in the mesh.
    #[inline]
    pub fn num_quads(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends one quad cut from `face_box` by `face`.
    ///
    /// The caller is responsible for keeping the vertex count within `u32` range.
    pub fn push_quad(
        &mut self,
        face: &ColumnFace,
        face_box: &FaceBox,
        u_flip_face: Axis,
        tile: &AtlasTile,
    ) {
        let start = self.positions.len() as u32;
        self.indices.extend_from_slice(&face.quad_mesh_indices(start));
        self.positions.extend_from_slice(&face.quad_mesh_positions(face_box));
        self.normals.extend_from_slice(&face.quad_mesh_normals());
        self.uvs.extend_from_slice(&face.tex_coords(u_flip_face, tile));
    }

    /// True if the buffer describes a valid triangle list: every vertex attribute has the same length, the indices
    /// come in triples, and every index points at a vertex.
    pub fn is_well_formed(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.uvs.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}
