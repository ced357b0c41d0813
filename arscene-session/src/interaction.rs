//! What a confirmed touch means right now
//!
//! The mode is chosen by the user through the on-screen controls and read
//! each time the framework confirms an anchor requested by a touch.

use crate::measurement::{MeasurementEngine, MeasurementPoint};
use crate::port::Tracker;
use crate::registry::SessionNodeRegistry;
use arscene_core::factory::{model_clone, sphere_node};
use arscene_core::{ModelSource, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Current meaning of touch input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Place clones of the named model
    Placing(String),
    Measuring,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionMode::Idle => write!(f, "idle"),
            InteractionMode::Placing(model_id) => write!(f, "placing {}", model_id),
            InteractionMode::Measuring => write!(f, "measuring"),
        }
    }
}

/// The mutually exclusive on-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    PlaceModelA,
    PlaceModelB,
    Measure,
    Reset,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::PlaceModelA,
        Control::PlaceModelB,
        Control::Measure,
        Control::Reset,
    ];
}

/// Collaborators touched while handling a confirmed anchor
pub struct SceneContext<'a, T: Tracker + ?Sized> {
    pub tracker: &'a mut T,
    pub registry: &'a mut SessionNodeRegistry,
    pub measurement: &'a mut MeasurementEngine,
    pub models: &'a dyn ModelSource,
    pub marker_radius: f32,
}

/// Outcome of a confirmed anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Nothing,
    Model(NodeId),
    Marker(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct InteractionStateMachine {
    mode: InteractionMode,
}

impl InteractionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Replace the mode, returning the previous one
    pub fn set_mode(&mut self, mode: InteractionMode) -> InteractionMode {
        info!(from = %self.mode, to = %mode, "interaction mode changed");
        std::mem::replace(&mut self.mode, mode)
    }

    /// Populate the node of a newly confirmed anchor according to the mode
    ///
    /// Placing clones the selected model under the anchor; measuring adds a
    /// marker under the anchor and feeds the anchor to the measurement
    /// window. Both register what they create.
    pub fn on_anchor_confirmed<T: Tracker + ?Sized>(
        &self,
        anchor_node: NodeId,
        ctx: SceneContext<'_, T>,
    ) -> Result<Placement> {
        match &self.mode {
            InteractionMode::Idle => {
                debug!(anchor = %anchor_node, "anchor confirmed while idle");
                Ok(Placement::Nothing)
            }
            InteractionMode::Placing(model_id) => {
                let clone = model_clone(ctx.models, model_id)?;
                let node = ctx.tracker.attach(Some(anchor_node), clone)?;
                ctx.registry.register(node);
                info!(model_id = %model_id, node = %node, anchor = %anchor_node, "placed model");
                Ok(Placement::Model(node))
            }
            InteractionMode::Measuring => {
                let marker = ctx.tracker.attach(Some(anchor_node), sphere_node(ctx.marker_radius))?;
                ctx.registry.register(marker);
                ctx.measurement
                    .push(MeasurementPoint { anchor_node, marker }, ctx.tracker, ctx.registry)?;
                debug!(marker = %marker, anchor = %anchor_node, points = ctx.measurement.len(), "placed marker");
                Ok(Placement::Marker(marker))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTracker;
    use arscene_core::{Error, Geometry, NodeRole, Point3f, SceneNode, Transform3D, TriangleMesh};
    use arscene_io::ModelLibrary;

    struct Fixture {
        tracker: SimulatedTracker,
        registry: SessionNodeRegistry,
        measurement: MeasurementEngine,
        models: ModelLibrary,
        machine: InteractionStateMachine,
    }

    impl Fixture {
        fn new() -> Self {
            let mut models = ModelLibrary::new();
            models.insert("candle", TriangleMesh::new());
            Self {
                tracker: SimulatedTracker::new(),
                registry: SessionNodeRegistry::new(),
                measurement: MeasurementEngine::new(),
                models,
                machine: InteractionStateMachine::new(),
            }
        }

        fn confirm(&mut self, x: f32) -> Result<Placement> {
            let anchor = self
                .tracker
                .attach(None, SceneNode::empty().with_transform(Transform3D::at(Point3f::new(x, 0.0, 0.0))))?;
            self.machine.on_anchor_confirmed(
                anchor,
                SceneContext {
                    tracker: &mut self.tracker,
                    registry: &mut self.registry,
                    measurement: &mut self.measurement,
                    models: &self.models,
                    marker_radius: 0.025,
                },
            )
        }
    }

    #[test]
    fn test_idle_is_noop() {
        let mut fx = Fixture::new();
        assert_eq!(fx.confirm(0.0).unwrap(), Placement::Nothing);
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn test_placing_clones_model_under_anchor() {
        let mut fx = Fixture::new();
        fx.machine.set_mode(InteractionMode::Placing("candle".into()));

        let Placement::Model(node) = fx.confirm(0.0).unwrap() else {
            panic!("expected a model placement");
        };
        let placed = fx.tracker.scene().get(node).unwrap();
        assert!(matches!(placed.geometry, Geometry::Mesh(_)));
        assert_eq!(placed.name.as_deref(), Some("candle"));
        assert_eq!(fx.registry.nodes(), &[node]);
        assert!(fx.measurement.is_empty());
    }

    #[test]
    fn test_placing_unknown_model_fails() {
        let mut fx = Fixture::new();
        fx.machine.set_mode(InteractionMode::Placing("lamp".into()));

        let result = fx.confirm(0.0);
        assert!(matches!(result, Err(Error::AssetNotFound { model_id }) if model_id == "lamp"));
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn test_measuring_adds_marker_and_point() {
        let mut fx = Fixture::new();
        fx.machine.set_mode(InteractionMode::Measuring);

        let Placement::Marker(marker) = fx.confirm(0.0).unwrap() else {
            panic!("expected a marker placement");
        };
        assert_eq!(fx.tracker.scene().get(marker).unwrap().role, NodeRole::MeasurementMarker);
        assert_eq!(fx.measurement.len(), 1);
        assert!(fx.registry.contains(marker));
    }

    #[test]
    fn test_latest_mode_wins() {
        let mut fx = Fixture::new();
        fx.machine.set_mode(InteractionMode::Measuring);
        let previous = fx.machine.set_mode(InteractionMode::Placing("candle".into()));

        assert_eq!(previous, InteractionMode::Measuring);
        assert!(matches!(fx.confirm(0.0).unwrap(), Placement::Model(_)));
        assert!(fx.measurement.is_empty());
    }
}
