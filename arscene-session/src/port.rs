//! The narrow capability set the session needs from the host AR framework
//!
//! Camera tracking, plane detection, hit-testing and rendering all live
//! behind [`Tracker`]. The session only asks it to run, to hit-test, to add
//! anchors and to attach or detach nodes.

use crate::config::SessionConfig;
use arscene_core::{NodeId, Point3f, Result, SceneNode, ScreenPoint, Transform3D, Vector3f};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a framework-tracked anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor-{}", self.0)
    }
}

/// What the framework knows about an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorKind {
    /// A detected plane, described relative to the anchor
    Plane { center: Point3f, extent: Vector3f },
    /// An anchor requested by the application
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub id: AnchorId,
    pub transform: Transform3D,
    pub kind: AnchorKind,
}

impl Anchor {
    pub fn is_plane(&self) -> bool {
        matches!(self.kind, AnchorKind::Plane { .. })
    }
}

/// Which surfaces a hit-test considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTestKind {
    /// Detected planes, bounded by their extent
    ExistingPlaneUsingExtent,
    /// Raw feature points from the camera feed
    FeaturePoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Distance from the camera, in meters
    pub distance: f32,
    pub world_transform: Transform3D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitedReason {
    ExcessiveMotion,
    InsufficientFeatures,
    Initializing,
}

/// Camera tracking quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingState {
    Normal,
    NotAvailable,
    Limited(LimitedReason),
}

impl TrackingState {
    /// Text shown in the tracking-quality line
    pub fn label(&self) -> &'static str {
        match self {
            TrackingState::Normal => "",
            TrackingState::NotAvailable => "No Tracking Data",
            TrackingState::Limited(LimitedReason::ExcessiveMotion) => {
                "Limited Tracking: Excessive Motion"
            }
            TrackingState::Limited(LimitedReason::InsufficientFeatures) => {
                "Limited Tracking: Insufficient Lighting"
            }
            TrackingState::Limited(LimitedReason::Initializing) => "Initializing...",
        }
    }
}

/// Options for (re)starting a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub remove_existing_anchors: bool,
    pub reset_tracking: bool,
}

impl RunOptions {
    /// Drop every anchor and start tracking from scratch
    pub fn reset() -> Self {
        Self {
            remove_existing_anchors: true,
            reset_tracking: true,
        }
    }
}

/// Renderer and tracker capabilities provided by the host framework
pub trait Tracker {
    /// Start or restart the tracking session
    fn run_session(&mut self, config: &SessionConfig, options: RunOptions) -> Result<()>;

    /// Project a screen point into the world; results are ordered nearest first
    fn hit_test(&self, point: ScreenPoint, kind: HitTestKind) -> Vec<HitResult>;

    /// Ask the framework to track a new anchor. The anchor's node arrives later
    /// through an anchor-added event.
    fn add_anchor(&mut self, transform: Transform3D) -> Result<AnchorId>;

    /// Attach `node` under `parent`, or under the scene root when `parent` is `None`
    fn attach(&mut self, parent: Option<NodeId>, node: SceneNode) -> Result<NodeId>;

    /// Detach a node and its subtree from the render tree
    fn detach(&mut self, node: NodeId) -> bool;

    /// Detach every child of `node`, keeping `node` itself. Returns how many were detached.
    fn detach_children(&mut self, node: NodeId) -> usize;

    fn world_position(&self, node: NodeId) -> Option<Point3f>;

    fn node_mut(&mut self, node: NodeId) -> Option<&mut SceneNode>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Tracking quality of the current frame, `None` before the first frame
    fn tracking_state(&self) -> Option<TrackingState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_labels() {
        assert_eq!(TrackingState::Normal.label(), "");
        assert_eq!(TrackingState::NotAvailable.label(), "No Tracking Data");
        assert_eq!(
            TrackingState::Limited(LimitedReason::InsufficientFeatures).label(),
            "Limited Tracking: Insufficient Lighting"
        );
        assert_eq!(
            TrackingState::Limited(LimitedReason::Initializing).label(),
            "Initializing..."
        );
    }

    #[test]
    fn test_reset_options() {
        let options = RunOptions::reset();
        assert!(options.remove_existing_anchors && options.reset_tracking);
        assert_eq!(RunOptions::default(), RunOptions { remove_existing_anchors: false, reset_tracking: false });
    }
}
