//! In-memory stand-in for the host AR framework
//!
//! [`SimulatedTracker`] keeps a [`SceneGraph`] as its render tree, answers
//! hit-tests from scripted results and reports anchor changes as
//! [`FrameworkEvent`]s, the same way the real framework calls back. Tests
//! and demos drive it to stage a session.

use crate::config::SessionConfig;
use crate::dispatch::{EventSender, FrameworkEvent};
use crate::port::{Anchor, AnchorId, AnchorKind, HitResult, HitTestKind, RunOptions, Tracker, TrackingState};
use arscene_core::{Error, NodeId, Point3f, Result, SceneGraph, SceneNode, ScreenPoint, Transform3D, Vector3f};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct SimulatedTracker {
    scene: SceneGraph,
    anchors: HashMap<AnchorId, (Anchor, NodeId)>,
    next_anchor: u64,
    hits: HashMap<HitTestKind, Vec<HitResult>>,
    tracking: Option<TrackingState>,
    runs: Vec<(SessionConfig, RunOptions)>,
    failing_run: Option<String>,
    interrupted: bool,
    events: Option<EventSender>,
}

impl SimulatedTracker {
    /// A tracker that keeps its callbacks to itself
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that reports anchor and session changes to `events`
    pub fn with_events(events: EventSender) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Every `run_session` call so far
    pub fn runs(&self) -> &[(SessionConfig, RunOptions)] {
        &self.runs
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(&id).map(|(anchor, _)| anchor)
    }

    pub fn anchor_node(&self, id: AnchorId) -> Option<NodeId> {
        self.anchors.get(&id).map(|(_, node)| *node)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Script what a hit-test of `kind` returns; results are sorted nearest first
    pub fn set_hits(&mut self, kind: HitTestKind, mut hits: Vec<HitResult>) {
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self.hits.insert(kind, hits);
    }

    pub fn clear_hits(&mut self) {
        self.hits.clear();
    }

    pub fn set_tracking_state(&mut self, state: Option<TrackingState>) {
        self.tracking = state;
    }

    /// Detect a plane, positioned by `transform`
    pub fn add_plane(&mut self, transform: Transform3D, center: Point3f, extent: Vector3f) -> Result<AnchorId> {
        self.track(transform, AnchorKind::Plane { center, extent })
    }

    /// Refine the geometry of a detected plane
    pub fn update_plane(&mut self, id: AnchorId, center: Point3f, extent: Vector3f) -> Result<()> {
        let (anchor, node) = self.anchors.get_mut(&id).ok_or_else(|| unknown_anchor(id))?;
        anchor.kind = AnchorKind::Plane { center, extent };
        let event = FrameworkEvent::AnchorUpdated { anchor: *anchor, node: *node };
        self.emit(event);
        Ok(())
    }

    /// Refine the pose of any anchor
    pub fn move_anchor(&mut self, id: AnchorId, transform: Transform3D) -> Result<()> {
        let (anchor, node) = self.anchors.get_mut(&id).ok_or_else(|| unknown_anchor(id))?;
        anchor.transform = transform;
        let (anchor, node) = (*anchor, *node);
        if let Some(scene_node) = self.scene.get_mut(node) {
            scene_node.transform = transform;
        }
        self.emit(FrameworkEvent::AnchorUpdated { anchor, node });
        Ok(())
    }

    /// Stop tracking an anchor. Its node stays in the tree for the handler
    /// to clean up.
    pub fn remove_anchor(&mut self, id: AnchorId) -> Result<()> {
        let (anchor, node) = self.anchors.remove(&id).ok_or_else(|| unknown_anchor(id))?;
        self.emit(FrameworkEvent::AnchorRemoved { anchor, node });
        Ok(())
    }

    /// Suspend tracking; anchors cannot be added until the interruption ends
    pub fn interrupt(&mut self) {
        self.interrupted = true;
        self.emit(FrameworkEvent::SessionInterrupted);
    }

    pub fn end_interruption(&mut self) {
        self.interrupted = false;
        self.emit(FrameworkEvent::SessionInterruptionEnded);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Make the next `run_session` call fail with `description`
    pub fn fail_next_run(&mut self, description: impl Into<String>) {
        self.failing_run = Some(description.into());
    }

    pub fn fail(&self, description: impl Into<String>) {
        self.emit(FrameworkEvent::SessionFailed(description.into()));
    }

    fn track(&mut self, transform: Transform3D, kind: AnchorKind) -> Result<AnchorId> {
        self.next_anchor += 1;
        let anchor = Anchor {
            id: AnchorId(self.next_anchor),
            transform,
            kind,
        };
        let node = self.scene.attach(None, SceneNode::empty().with_transform(transform))?;
        self.anchors.insert(anchor.id, (anchor, node));
        self.emit(FrameworkEvent::AnchorAdded { anchor, node });
        Ok(anchor.id)
    }

    fn emit(&self, event: FrameworkEvent) {
        if let Some(events) = &self.events {
            events.send(event);
        }
    }
}

fn unknown_anchor(id: AnchorId) -> Error {
    Error::InvalidData(format!("unknown {}", id))
}

impl Tracker for SimulatedTracker {
    fn run_session(&mut self, config: &SessionConfig, options: RunOptions) -> Result<()> {
        debug!(?options, "simulated session run");
        if let Some(description) = self.failing_run.take() {
            return Err(Error::SessionFailure(description));
        }
        if options.remove_existing_anchors {
            let removed: Vec<(Anchor, NodeId)> = self.anchors.drain().map(|(_, entry)| entry).collect();
            for (anchor, node) in removed {
                self.scene.detach(node);
                self.emit(FrameworkEvent::AnchorRemoved { anchor, node });
            }
        }
        self.runs.push((config.clone(), options));
        Ok(())
    }

    fn hit_test(&self, _point: ScreenPoint, kind: HitTestKind) -> Vec<HitResult> {
        self.hits.get(&kind).cloned().unwrap_or_default()
    }

    fn add_anchor(&mut self, transform: Transform3D) -> Result<AnchorId> {
        if self.interrupted {
            return Err(Error::Interruption("tracking is suspended".to_string()));
        }
        self.track(transform, AnchorKind::Point)
    }

    fn attach(&mut self, parent: Option<NodeId>, node: SceneNode) -> Result<NodeId> {
        self.scene.attach(parent, node)
    }

    fn detach(&mut self, node: NodeId) -> bool {
        self.scene.detach(node)
    }

    fn detach_children(&mut self, node: NodeId) -> usize {
        self.scene.detach_children(node)
    }

    fn world_position(&self, node: NodeId) -> Option<Point3f> {
        self.scene.world_position(node)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut SceneNode> {
        self.scene.get_mut(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.scene.children(node)
    }

    fn tracking_state(&self) -> Option<TrackingState> {
        self.tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::channel;

    #[test]
    fn test_add_anchor_reports_node() {
        let (events, queue) = channel();
        let mut tracker = SimulatedTracker::with_events(events);

        let id = tracker.add_anchor(Transform3D::at(Point3f::new(0.0, 0.0, -1.0))).unwrap();
        let node = tracker.anchor_node(id).unwrap();

        assert_eq!(tracker.world_position(node), Some(Point3f::new(0.0, 0.0, -1.0)));
        match queue.drain().as_slice() {
            [FrameworkEvent::AnchorAdded { anchor, node: reported }] => {
                assert_eq!(anchor.id, id);
                assert_eq!(anchor.kind, AnchorKind::Point);
                assert_eq!(*reported, node);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_hits_are_sorted() {
        let mut tracker = SimulatedTracker::new();
        let far = HitResult { distance: 3.0, world_transform: Transform3D::identity() };
        let near = HitResult { distance: 1.0, world_transform: Transform3D::identity() };
        tracker.set_hits(HitTestKind::FeaturePoint, vec![far, near]);

        let hits = tracker.hit_test(ScreenPoint::new(0.0, 0.0), HitTestKind::FeaturePoint);
        assert_eq!(hits, vec![near, far]);
        assert!(tracker.hit_test(ScreenPoint::new(0.0, 0.0), HitTestKind::ExistingPlaneUsingExtent).is_empty());
    }

    #[test]
    fn test_reset_run_drops_anchors() {
        let (events, queue) = channel();
        let mut tracker = SimulatedTracker::with_events(events);
        tracker.add_anchor(Transform3D::identity()).unwrap();
        queue.drain();

        tracker.run_session(&SessionConfig::default(), RunOptions::reset()).unwrap();

        assert_eq!(tracker.anchor_count(), 0);
        assert!(tracker.scene().is_empty());
        assert_eq!(tracker.runs().len(), 1);
        assert!(matches!(queue.drain().as_slice(), [FrameworkEvent::AnchorRemoved { .. }]));
    }

    #[test]
    fn test_failed_run_is_not_recorded() {
        let mut tracker = SimulatedTracker::new();
        tracker.fail_next_run("Camera unavailable");

        let result = tracker.run_session(&SessionConfig::default(), RunOptions::default());
        assert!(matches!(result, Err(Error::SessionFailure(d)) if d == "Camera unavailable"));
        assert!(tracker.runs().is_empty());

        tracker.run_session(&SessionConfig::default(), RunOptions::default()).unwrap();
        assert_eq!(tracker.runs().len(), 1);
    }

    #[test]
    fn test_no_anchors_while_interrupted() {
        let mut tracker = SimulatedTracker::new();
        tracker.interrupt();
        assert!(matches!(tracker.add_anchor(Transform3D::identity()), Err(Error::Interruption(_))));

        tracker.end_interruption();
        assert!(tracker.add_anchor(Transform3D::identity()).is_ok());
    }

    #[test]
    fn test_unknown_anchor() {
        let mut tracker = SimulatedTracker::new();
        assert!(tracker.move_anchor(AnchorId(42), Transform3D::identity()).is_err());
    }
}
