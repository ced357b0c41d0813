//! Nodes added to the scene on the application's behalf

use crate::port::Tracker;
use arscene_core::NodeId;
use tracing::debug;

/// Insertion-ordered handles of every node placed by the application
///
/// The registry does not own nodes; it remembers which ones to detach when
/// the session is cleared. Framework-added geometry (debug planes, anchors)
/// is never registered.
#[derive(Debug, Clone, Default)]
pub struct SessionNodeRegistry {
    nodes: Vec<NodeId>,
}

impl SessionNodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a node placed by the application
    pub fn register(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    /// Detach every registered node and forget them all
    pub fn clear<T: Tracker + ?Sized>(&mut self, tracker: &mut T) {
        if self.nodes.is_empty() {
            return;
        }

        let count = self.nodes.len();
        for node in self.nodes.drain(..) {
            tracker.detach(node);
        }
        debug!(count, "cleared session nodes");
    }

    /// Detach and forget a single node. Returns `false` if it was not registered.
    pub fn remove_from_app_scope<T: Tracker + ?Sized>(&mut self, tracker: &mut T, node: NodeId) -> bool {
        let Some(index) = self.nodes.iter().position(|registered| *registered == node) else {
            return false;
        };
        self.nodes.remove(index);
        tracker.detach(node);
        true
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered nodes in insertion order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTracker;
    use arscene_core::SceneNode;

    fn place(tracker: &mut SimulatedTracker, registry: &mut SessionNodeRegistry) -> NodeId {
        let node = tracker.attach(None, SceneNode::empty()).unwrap();
        registry.register(node);
        node
    }

    #[test]
    fn test_register_keeps_insertion_order() {
        let mut tracker = SimulatedTracker::new();
        let mut registry = SessionNodeRegistry::new();
        let a = place(&mut tracker, &mut registry);
        let b = place(&mut tracker, &mut registry);

        assert_eq!(registry.nodes(), &[a, b]);
    }

    #[test]
    fn test_clear_detaches_everything_and_is_idempotent() {
        let mut tracker = SimulatedTracker::new();
        let mut registry = SessionNodeRegistry::new();
        let a = place(&mut tracker, &mut registry);
        let b = place(&mut tracker, &mut registry);

        registry.clear(&mut tracker);
        assert!(registry.is_empty());
        assert!(!tracker.scene().contains(a));
        assert!(!tracker.scene().contains(b));

        registry.clear(&mut tracker);
        assert!(registry.is_empty());
        assert!(tracker.scene().is_empty());
    }

    #[test]
    fn test_remove_single_node() {
        let mut tracker = SimulatedTracker::new();
        let mut registry = SessionNodeRegistry::new();
        let a = place(&mut tracker, &mut registry);
        let b = place(&mut tracker, &mut registry);

        assert!(registry.remove_from_app_scope(&mut tracker, a));
        assert_eq!(registry.nodes(), &[b]);
        assert!(!tracker.scene().contains(a));
        assert!(tracker.scene().contains(b));

        assert!(!registry.remove_from_app_scope(&mut tracker, a));
    }
}
