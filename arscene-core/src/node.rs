//! Scene nodes: identity, role, geometry and material

use crate::geometry::Point3f;
use crate::mesh::TriangleMesh;
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node in the scene graph
///
/// Handles are non-owning: the render tree owns the node, everything else
/// refers to it by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is for, from the application's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    None,
    MeasurementMarker,
    MeasurementLine,
    DebugPlane,
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Surface appearance of a node's geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub diffuse: Color,
}

impl Material {
    pub fn diffuse(color: Color) -> Self {
        Self { diffuse: color }
    }
}

/// Renderable content attached to a node
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Pure grouping node (anchors, model roots)
    Empty,
    /// Flat quad, `width` along local X and `height` along local Y
    Plane { width: f32, height: f32 },
    Sphere { radius: f32 },
    /// Two-vertex line primitive
    Line { vertices: [Point3f; 2] },
    /// Loaded model geometry, shared between clones
    Mesh(Arc<TriangleMesh>),
}

impl Geometry {
    /// Short name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Empty => "empty",
            Geometry::Plane { .. } => "plane",
            Geometry::Sphere { .. } => "sphere",
            Geometry::Line { .. } => "line",
            Geometry::Mesh(_) => "mesh",
        }
    }
}

/// A positioned, renderable element of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: Option<String>,
    pub role: NodeRole,
    pub geometry: Geometry,
    pub material: Option<Material>,
    /// Transform relative to the parent node
    pub transform: Transform3D,
}

impl SceneNode {
    /// Create a node with a fresh id
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: NodeId::next(),
            name: None,
            role: NodeRole::None,
            geometry,
            material: None,
            transform: Transform3D::identity(),
        }
    }

    /// Create an empty grouping node
    pub fn empty() -> Self {
        Self::new(Geometry::Empty)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Position relative to the parent node
    pub fn position(&self) -> Point3f {
        self.transform.position()
    }
}
