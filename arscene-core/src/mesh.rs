//! Triangle meshes backing loaded model assets

use crate::error::{Error, Result};
use crate::geometry::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces, rejecting out-of-range indices
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(face) = faces.iter().find(|face| face.iter().any(|&i| i >= vertices.len())) {
            return Err(Error::InvalidData(format!(
                "face {:?} references a vertex beyond {}",
                face,
                vertices.len()
            )));
        }

        Ok(Self {
            vertices,
            faces,
            normals: None,
        })
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh without vertices
    pub fn bounding_box(&self) -> Option<(Point3f, Point3f)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for vertex in &self.vertices {
            min.x = min.x.min(vertex.x);
            min.y = min.y.min(vertex.y);
            min.z = min.z.min(vertex.z);

            max.x = max.x.max(vertex.x);
            max.y = max.y.max(vertex.y);
            max.z = max.z.max(vertex.z);
        }

        Some((min, max))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
