//! Core traits for arscene

use crate::mesh::TriangleMesh;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for catalogs that resolve model ids to loaded geometry
pub trait ModelSource {
    /// Look up the mesh registered under `model_id`
    fn mesh(&self, model_id: &str) -> Option<Arc<TriangleMesh>>;

    /// Check whether `model_id` resolves to a loaded asset
    fn contains(&self, model_id: &str) -> bool {
        self.mesh(model_id).is_some()
    }
}

impl ModelSource for HashMap<String, Arc<TriangleMesh>> {
    fn mesh(&self, model_id: &str) -> Option<Arc<TriangleMesh>> {
        self.get(model_id).cloned()
    }
}
