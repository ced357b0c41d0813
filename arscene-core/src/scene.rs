//! In-memory scene graph
//!
//! The graph is the sole owner of its nodes. Callers hold [`NodeId`]s and
//! go through the graph to read, mutate or detach a node; detaching a node
//! drops its whole subtree.

use crate::error::{Error, Result};
use crate::geometry::Point3f;
use crate::node::{NodeId, SceneNode};
use crate::transform::Transform3D;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    node: SceneNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of scene nodes hanging off an implicit root
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    entries: HashMap<NodeId, Entry>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the scene, at any depth
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Attach `node` under `parent`, or under the scene root when `parent` is `None`
    pub fn attach(&mut self, parent: Option<NodeId>, node: SceneNode) -> Result<NodeId> {
        let id = node.id;
        if self.entries.contains_key(&id) {
            return Err(Error::InvalidData(format!("node {} is already attached", id)));
        }

        match parent {
            Some(parent_id) => self
                .entries
                .get_mut(&parent_id)
                .ok_or(Error::NodeNotFound(parent_id))?
                .children
                .push(id),
            None => self.roots.push(id),
        }

        self.entries.insert(
            id,
            Entry {
                node,
                parent,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Detach a node and its subtree. Returns `false` if the node was not attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };

        match entry.parent {
            Some(parent_id) => {
                if let Some(parent) = self.entries.get_mut(&parent_id) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(removed) = self.entries.remove(&next) {
                pending.extend(removed.children);
            }
        }
        true
    }

    /// Detach every child of `id`, keeping `id` itself
    pub fn detach_children(&mut self, id: NodeId) -> usize {
        let children = self.children(id);
        children.into_iter().filter(|child| self.detach(*child)).count()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.entries.get(&id).map(|entry| &entry.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.entries.get_mut(&id).map(|entry| &mut entry.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(&id).and_then(|entry| entry.parent)
    }

    /// Direct children in attachment order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.entries
            .get(&id)
            .map(|entry| entry.children.clone())
            .unwrap_or_default()
    }

    /// Nodes attached directly under the scene root
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Transform from the node's local space to world space
    pub fn world_transform(&self, id: NodeId) -> Option<Transform3D> {
        let mut entry = self.entries.get(&id)?;
        let mut world = entry.node.transform;
        while let Some(parent_id) = entry.parent {
            entry = self.entries.get(&parent_id)?;
            world = entry.node.transform * world;
        }
        Some(world)
    }

    /// World-space position of the node's origin
    pub fn world_position(&self, id: NodeId) -> Option<Point3f> {
        self.world_transform(id).map(|transform| transform.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Geometry;

    fn anchor_at(x: f32, y: f32, z: f32) -> SceneNode {
        SceneNode::empty().with_transform(Transform3D::at(Point3f::new(x, y, z)))
    }

    #[test]
    fn test_attach_and_query() {
        let mut scene = SceneGraph::new();
        let anchor = scene.attach(None, anchor_at(1.0, 0.0, 0.0)).unwrap();
        let child = scene
            .attach(Some(anchor), SceneNode::new(Geometry::Sphere { radius: 0.025 }))
            .unwrap();

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.roots(), &[anchor]);
        assert_eq!(scene.children(anchor), vec![child]);
        assert_eq!(scene.parent(child), Some(anchor));
    }

    #[test]
    fn test_attach_under_missing_parent() {
        let mut scene = SceneGraph::new();
        let missing = NodeId::next();
        let result = scene.attach(Some(missing), SceneNode::empty());
        assert!(matches!(result, Err(Error::NodeNotFound(id)) if id == missing));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_attach_twice_is_rejected() {
        let mut scene = SceneGraph::new();
        let node = SceneNode::empty();
        scene.attach(None, node.clone()).unwrap();
        assert!(scene.attach(None, node).is_err());
    }

    #[test]
    fn test_detach_removes_subtree() {
        let mut scene = SceneGraph::new();
        let anchor = scene.attach(None, anchor_at(0.0, 0.0, 0.0)).unwrap();
        let child = scene.attach(Some(anchor), SceneNode::empty()).unwrap();
        let grandchild = scene.attach(Some(child), SceneNode::empty()).unwrap();

        assert!(scene.detach(anchor));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.roots().is_empty());
        assert!(!scene.detach(anchor));
    }

    #[test]
    fn test_detach_children_keeps_parent() {
        let mut scene = SceneGraph::new();
        let anchor = scene.attach(None, anchor_at(0.0, 0.0, 0.0)).unwrap();
        scene.attach(Some(anchor), SceneNode::empty()).unwrap();
        scene.attach(Some(anchor), SceneNode::empty()).unwrap();

        assert_eq!(scene.detach_children(anchor), 2);
        assert!(scene.contains(anchor));
        assert!(scene.children(anchor).is_empty());
    }

    #[test]
    fn test_world_position_accumulates_parents() {
        let mut scene = SceneGraph::new();
        let anchor = scene.attach(None, anchor_at(1.0, 2.0, 3.0)).unwrap();
        let child = scene.attach(Some(anchor), anchor_at(0.5, 0.0, 0.0)).unwrap();

        assert_eq!(scene.world_position(child), Some(Point3f::new(1.5, 2.0, 3.0)));
        assert_eq!(scene.world_position(NodeId::next()), None);
    }
}
