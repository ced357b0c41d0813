//! Scene node factory
//!
//! Stateless constructors turning semantic parameters into renderable
//! nodes. Every call hands out a node with a fresh id.

use crate::error::{Error, Result};
use crate::geometry::{Point3f, Vector3f};
use crate::node::{Color, Geometry, Material, NodeRole, SceneNode};
use crate::traits::ModelSource;
use crate::transform::Transform3D;
use nalgebra::UnitQuaternion;

/// Name given to connecting lines between measurement markers
pub const MEASURING_LINE_NAME: &str = "Measuring Line";

/// Opacity of debug plane quads
pub const PLANE_ALPHA: f32 = 0.3;

fn flat_on_ground() -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), -std::f32::consts::FRAC_PI_2)
}

/// Quad visualising a detected plane
///
/// The quad is `extent.x` by `extent.z`, centred at `(center.x, 0, center.z)`
/// relative to the plane anchor and rotated to lie in the anchor's XZ plane.
pub fn plane_node(center: Point3f, extent: Vector3f) -> SceneNode {
    let transform =
        Transform3D::from_translation_rotation(Vector3f::new(center.x, 0.0, center.z), flat_on_ground());

    SceneNode::new(Geometry::Plane {
        width: extent.x,
        height: extent.z,
    })
    .with_role(NodeRole::DebugPlane)
    .with_material(Material::diffuse(Color::BLUE.with_alpha(PLANE_ALPHA)))
    .with_transform(transform)
}

/// Resize and reposition a plane quad in place
///
/// Fails with [`Error::InvalidGeometryCast`] when `node` does not carry plane
/// geometry; the node is left untouched in that case.
pub fn update_plane_node(node: &mut SceneNode, center: Point3f, extent: Vector3f) -> Result<()> {
    match &mut node.geometry {
        Geometry::Plane { width, height } => {
            *width = extent.x;
            *height = extent.z;
        }
        other => {
            return Err(Error::InvalidGeometryCast {
                node: node.id,
                expected: "plane",
                found: other.kind(),
            })
        }
    }

    node.transform.set_position(Point3f::new(center.x, 0.0, center.z));
    Ok(())
}

/// Solid green sphere marking a measurement endpoint
pub fn sphere_node(radius: f32) -> SceneNode {
    SceneNode::new(Geometry::Sphere { radius })
        .with_role(NodeRole::MeasurementMarker)
        .with_material(Material::diffuse(Color::GREEN))
}

/// Red line between two world positions
///
/// The endpoints are copied, not bound: rebuild the line when either end moves.
pub fn line_node(from: Point3f, to: Point3f) -> SceneNode {
    SceneNode::new(Geometry::Line { vertices: [from, to] })
        .with_name(MEASURING_LINE_NAME)
        .with_role(NodeRole::MeasurementLine)
        .with_material(Material::diffuse(Color::RED))
}

/// Independent node carrying the geometry of the model registered as `model_id`
pub fn model_clone(models: &dyn ModelSource, model_id: &str) -> Result<SceneNode> {
    let mesh = models.mesh(model_id).ok_or_else(|| Error::AssetNotFound {
        model_id: model_id.to_string(),
    })?;

    Ok(SceneNode::new(Geometry::Mesh(mesh)).with_name(model_id))
}
