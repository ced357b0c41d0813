//! Core data structures for arscene
//!
//! This crate provides the scene-side building blocks shared by the session
//! layer: points and distances, transforms, triangle meshes for loaded
//! models, scene nodes with their roles, an in-memory scene graph, and the
//! node factory that turns semantic parameters into renderable nodes.

pub mod geometry;
pub mod transform;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod factory;
pub mod traits;
pub mod error;

pub use geometry::*;
pub use transform::*;
pub use mesh::*;
pub use node::*;
pub use scene::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4, UnitQuaternion};
