//! Catalog of loaded model assets

use crate::read_mesh;
use arscene_core::{Error, ModelSource, Result, TriangleMesh};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Loaded model geometry keyed by model id
///
/// Assets are loaded once up front; placing a model clones a node that
/// shares the loaded mesh.
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    models: HashMap<String, Arc<TriangleMesh>>,
}

impl ModelLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built mesh under `model_id`, replacing any previous entry
    pub fn insert(&mut self, model_id: impl Into<String>, mesh: TriangleMesh) {
        let model_id = model_id.into();
        debug!(model_id = %model_id, vertices = mesh.vertex_count(), "registered model");
        self.models.insert(model_id, Arc::new(mesh));
    }

    /// Load the model file at `path` and register it under `model_id`
    ///
    /// A missing file is reported as [`Error::AssetNotFound`]: model assets ship
    /// with the application, so their absence is a packaging defect.
    pub fn load<P: AsRef<Path>>(&mut self, model_id: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        let mesh = read_mesh(path).map_err(|e| match e {
            Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => Error::AssetNotFound {
                model_id: model_id.to_string(),
            },
            other => other,
        })?;

        info!(
            model_id,
            path = %path.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "loaded model"
        );
        self.models.insert(model_id.to_string(), Arc::new(mesh));
        Ok(())
    }

    /// Fail with [`Error::AssetNotFound`] for the first id that is not loaded
    pub fn ensure<'a, I>(&self, model_ids: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match model_ids.into_iter().find(|id| !self.models.contains_key(*id)) {
            Some(missing) => Err(Error::AssetNotFound {
                model_id: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered model ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

impl ModelSource for ModelLibrary {
    fn mesh(&self, model_id: &str) -> Option<Arc<TriangleMesh>> {
        self.models.get(model_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arscene_core::Point3f;

    fn triangle() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_resolve() {
        let mut library = ModelLibrary::new();
        library.insert("candle", triangle());

        assert_eq!(library.len(), 1);
        assert!(library.contains("candle"));
        assert!(library.mesh("chair").is_none());
        assert_eq!(library.ids().collect::<Vec<_>>(), vec!["candle"]);
    }

    #[test]
    fn test_load_missing_file_is_asset_not_found() {
        let mut library = ModelLibrary::new();
        let result = library.load("chair", "models/missing/chair.obj");

        assert!(matches!(result, Err(Error::AssetNotFound { model_id }) if model_id == "chair"));
        assert!(library.is_empty());
    }

    #[test]
    fn test_ensure_reports_first_missing() {
        let mut library = ModelLibrary::new();
        library.insert("candle", triangle());

        assert!(library.ensure(["candle"]).is_ok());
        let result = library.ensure(["candle", "chair"]);
        assert!(matches!(result, Err(Error::AssetNotFound { model_id }) if model_id == "chair"));
    }
}
