//! Debug quads for detected planes

use crate::port::{AnchorId, Tracker};
use arscene_core::factory::{plane_node, update_plane_node};
use arscene_core::{NodeId, Point3f, Result, Vector3f};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One quad per plane anchor, keyed by anchor identity
#[derive(Debug, Clone, Default)]
pub struct PlaneRecords {
    quads: HashMap<AnchorId, NodeId>,
}

impl PlaneRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a quad for a newly detected plane and attach it under the anchor node
    pub fn add<T: Tracker + ?Sized>(
        &mut self,
        tracker: &mut T,
        anchor: AnchorId,
        anchor_node: NodeId,
        center: Point3f,
        extent: Vector3f,
    ) -> Result<NodeId> {
        let quad = tracker.attach(Some(anchor_node), plane_node(center, extent))?;
        self.quads.insert(anchor, quad);
        debug!(%anchor, quad = %quad, width = extent.x, depth = extent.z, "plane added");
        Ok(quad)
    }

    /// Resize and move the quad of a refined plane
    ///
    /// Planes without a quad are ignored. A recorded node that is not a plane
    /// is logged and left alone.
    pub fn update<T: Tracker + ?Sized>(&self, tracker: &mut T, anchor: AnchorId, center: Point3f, extent: Vector3f) {
        let Some(&quad) = self.quads.get(&anchor) else {
            return;
        };
        let Some(node) = tracker.node_mut(quad) else {
            warn!(%anchor, quad = %quad, "plane quad is no longer in the scene");
            return;
        };
        if let Err(e) = update_plane_node(node, center, extent) {
            warn!(%anchor, error = %e, "skipping plane update");
        }
    }

    /// Detach everything under a removed plane's anchor node
    pub fn remove<T: Tracker + ?Sized>(&mut self, tracker: &mut T, anchor: AnchorId, anchor_node: NodeId) {
        self.quads.remove(&anchor);
        let detached = tracker.detach_children(anchor_node);
        debug!(%anchor, detached, "plane removed");
    }

    /// Forget every quad, e.g. after the framework dropped all anchors
    pub fn forget(&mut self) {
        self.quads.clear();
    }

    pub fn quad(&self, anchor: AnchorId) -> Option<NodeId> {
        self.quads.get(&anchor).copied()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTracker;
    use arscene_core::factory::sphere_node;
    use arscene_core::{Geometry, SceneNode};

    #[test]
    fn test_add_update_remove() {
        let mut tracker = SimulatedTracker::new();
        let mut planes = PlaneRecords::new();
        let anchor = AnchorId(7);
        let anchor_node = tracker.attach(None, SceneNode::empty()).unwrap();

        let quad = planes
            .add(&mut tracker, anchor, anchor_node, Point3f::origin(), Vector3f::new(1.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(tracker.children(anchor_node), vec![quad]);

        planes.update(&mut tracker, anchor, Point3f::new(0.5, 0.0, 0.5), Vector3f::new(2.0, 0.0, 3.0));
        let node = tracker.scene().get(quad).unwrap();
        assert_eq!(node.geometry, Geometry::Plane { width: 2.0, height: 3.0 });
        assert_eq!(node.position(), Point3f::new(0.5, 0.0, 0.5));

        planes.remove(&mut tracker, anchor, anchor_node);
        assert!(planes.is_empty());
        assert!(tracker.children(anchor_node).is_empty());
        assert!(tracker.scene().contains(anchor_node));
    }

    #[test]
    fn test_update_on_non_plane_is_skipped() {
        let mut tracker = SimulatedTracker::new();
        let anchor = AnchorId(1);
        let anchor_node = tracker.attach(None, SceneNode::empty()).unwrap();
        let sphere = tracker.attach(Some(anchor_node), sphere_node(0.025)).unwrap();

        let mut planes = PlaneRecords::new();
        planes.quads.insert(anchor, sphere);
        planes.update(&mut tracker, anchor, Point3f::new(1.0, 0.0, 1.0), Vector3f::new(2.0, 0.0, 2.0));

        let node = tracker.scene().get(sphere).unwrap();
        assert_eq!(node.geometry, Geometry::Sphere { radius: 0.025 });
        assert_eq!(node.position(), Point3f::origin());
    }

    #[test]
    fn test_update_unknown_anchor_is_ignored() {
        let mut tracker = SimulatedTracker::new();
        let planes = PlaneRecords::new();
        planes.update(&mut tracker, AnchorId(3), Point3f::origin(), Vector3f::new(1.0, 0.0, 1.0));
        assert!(tracker.scene().is_empty());
    }
}
