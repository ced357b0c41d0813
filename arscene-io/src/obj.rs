//! OBJ format support

use crate::MeshReader;
use arscene_core::{Error, Point3f, Result, TriangleMesh};
use obj::ObjData;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct ObjReader;

impl ObjReader {
    /// Parse OBJ text from any reader
    ///
    /// Every group of every object is merged into one mesh; polygons with more
    /// than three corners are fan-triangulated.
    pub fn read_from<R: Read>(input: R) -> Result<TriangleMesh> {
        let data = ObjData::load_buf(input)
            .map_err(|e| Error::InvalidData(format!("OBJ parse error: {:?}", e)))?;

        let vertices: Vec<Point3f> = data
            .position
            .iter()
            .map(|p| Point3f::new(p[0], p[1], p[2]))
            .collect();

        let mut faces = Vec::new();
        for object in &data.objects {
            for group in &object.groups {
                for poly in &group.polys {
                    let corners: Vec<usize> = poly.0.iter().map(|tuple| tuple.0).collect();
                    if corners.len() < 3 {
                        continue;
                    }
                    for i in 1..corners.len() - 1 {
                        faces.push([corners[0], corners[i], corners[i + 1]]);
                    }
                }
            }
        }

        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 0.0 1.0
v 0.0 0.0 1.0
f 1 2 3 4
";

    #[test]
    fn test_read_quad_is_triangulated() {
        let mesh = ObjReader::read_from(QUAD.as_bytes()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(max.z, 1.0);
    }

    #[test]
    fn test_read_missing_file() {
        let result = ObjReader::read_mesh("does/not/exist.obj");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
