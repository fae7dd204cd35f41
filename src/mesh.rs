use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("index {index} at position {position} references a missing vertex ({vertex_count} vertices)")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
    #[error("mesh has {normals} normals for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// Vertex positions plus a flattened triangle index list.
///
/// Validated on construction: every vertex is finite and every index resolves to a vertex.
/// Duplicated indices (a vertex shared by several faces) are expected and kept.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    normals: Option<Vec<Vec3>>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<MeshData, MeshError> {
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::NonFiniteVertex { index });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            indices,
            normals: None,
        })
    }

    /// Attaches one normal per vertex
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<MeshData, MeshError> {
        if normals.len() != self.vertices.len() {
            return Err(MeshError::NormalCountMismatch {
                normals: normals.len(),
                vertices: self.vertices.len(),
            });
        }
        self.normals = Some(normals);
        Ok(self)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    pub fn vertex(&self, index: u32) -> Option<Vec3> {
        self.vertices.get(index as usize).copied()
    }

    pub fn normal(&self, index: u32) -> Option<Vec3> {
        self.normals.as_ref()?.get(index as usize).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}
