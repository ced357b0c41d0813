//! Model asset loading
//!
//! Reads model geometry from disk and keeps it in a [`ModelLibrary`] that the
//! node factory clones placed models from.

pub mod obj;
pub mod library;

pub use library::ModelLibrary;

use arscene_core::{Error, Result, TriangleMesh};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("obj") => obj::ObjReader::read_mesh(path),
        _ => Err(Error::InvalidData(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
