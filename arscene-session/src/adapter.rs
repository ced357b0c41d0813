//! Glue between framework callbacks and the session components
//!
//! [`PresentationAdapter`] owns the tracker, the interaction state machine,
//! the node registry, the measurement window, the plane quads and the
//! presentation state. Every callback from the framework (or the user) is
//! routed through [`PresentationAdapter::handle`], which is the only place
//! any of this state changes.

use crate::config::AppConfig;
use crate::dispatch::{FrameworkEvent, MainQueue};
use crate::interaction::{Control, InteractionMode, InteractionStateMachine, Placement, SceneContext};
use crate::measurement::MeasurementEngine;
use crate::planes::PlaneRecords;
use crate::port::{Anchor, AnchorId, AnchorKind, HitTestKind, RunOptions, Tracker};
use crate::presentation::{PresentationState, Reticle};
use crate::registry::SessionNodeRegistry;
use arscene_core::{Error, NodeId, Result};
use arscene_io::ModelLibrary;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Message shown when the framework suspends tracking
pub const INTERRUPTED_MESSAGE: &str = "Session Interrupted";

/// Message shown when tracking resumes after an interruption
pub const RESUMING_MESSAGE: &str = "Resuming Session...";

pub struct PresentationAdapter<T: Tracker> {
    tracker: T,
    config: AppConfig,
    models: ModelLibrary,
    interaction: InteractionStateMachine,
    registry: SessionNodeRegistry,
    measurement: MeasurementEngine,
    planes: PlaneRecords,
    presentation: PresentationState,
}

impl<T: Tracker> PresentationAdapter<T> {
    /// Assemble a session around `tracker`
    ///
    /// Both configured model slots must be present in `models`; a missing one
    /// fails with `AssetNotFound` here rather than on the first touch.
    pub fn new(tracker: T, config: AppConfig, models: ModelLibrary) -> Result<Self> {
        models.ensure(config.models.iter().map(|spec| spec.id.as_str()))?;

        Ok(Self {
            tracker,
            config,
            models,
            interaction: InteractionStateMachine::new(),
            registry: SessionNodeRegistry::new(),
            measurement: MeasurementEngine::new(),
            planes: PlaneRecords::new(),
            presentation: PresentationState::default(),
        })
    }

    /// Start tracking for the first time
    ///
    /// A framework that refuses to run fails here with `SessionFailure`.
    pub fn start(&mut self) -> Result<()> {
        info!(
            horizontal_planes = self.config.session.plane_detection_horizontal,
            light_estimation = self.config.session.light_estimation,
            "starting session"
        );
        self.tracker.run_session(&self.config.session, RunOptions::default())
    }

    /// Handle every queued event, in order. Returns how many were handled.
    ///
    /// A failing event is logged and does not stop the ones behind it; the
    /// first failure is returned once the batch is done. Events posted while
    /// handling (for example anchors dropped by a session restart) are left
    /// for the next call.
    pub fn pump(&mut self, queue: &MainQueue, now: Instant) -> Result<usize> {
        let events = queue.drain();
        let count = events.len();
        let mut first_error = None;
        for event in events {
            if let Err(e) = self.handle(event, now) {
                error!(error = %e, "event handling failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    pub fn handle(&mut self, event: FrameworkEvent, now: Instant) -> Result<()> {
        match event {
            FrameworkEvent::SessionFailed(description) => {
                self.on_session_failed(description, now);
                Ok(())
            }
            FrameworkEvent::SessionInterrupted => {
                self.on_session_interrupted(now);
                Ok(())
            }
            FrameworkEvent::SessionInterruptionEnded => self.on_session_interruption_ended(now),
            FrameworkEvent::AnchorAdded { anchor, node } => self.on_anchor_added(&anchor, node),
            FrameworkEvent::AnchorUpdated { anchor, node } => self.on_anchor_updated(&anchor, node),
            FrameworkEvent::AnchorRemoved { anchor, node } => {
                self.on_anchor_removed(&anchor, node);
                Ok(())
            }
            FrameworkEvent::FrameAdvanced => {
                self.on_frame_advanced(now);
                Ok(())
            }
            FrameworkEvent::TouchConfirmed => self.on_touch_confirmed().map(|_| ()),
            FrameworkEvent::ControlPressed(control) => self.select(control, now),
        }
    }

    pub fn on_session_failed(&mut self, description: String, now: Instant) {
        error!(%description, "session failed");
        self.show_message(description, now);
    }

    pub fn on_session_interrupted(&mut self, now: Instant) {
        warn!("session interrupted");
        self.show_message(INTERRUPTED_MESSAGE, now);
    }

    /// Clear everything the app placed and restart tracking from scratch
    pub fn on_session_interruption_ended(&mut self, now: Instant) -> Result<()> {
        info!("session interruption ended, resetting");
        self.show_message(RESUMING_MESSAGE, now);
        self.clear_session();
        self.planes.forget();
        self.restart_session(now)
    }

    pub fn on_anchor_added(&mut self, anchor: &Anchor, node: NodeId) -> Result<()> {
        // The anchor may have been dropped by a restart after the event was posted
        if self.tracker.world_position(node).is_none() {
            warn!(anchor = %anchor.id, node = %node, "ignoring anchor whose node left the scene");
            return Ok(());
        }

        match anchor.kind {
            AnchorKind::Plane { center, extent } => {
                if self.config.debug_planes {
                    self.planes.add(&mut self.tracker, anchor.id, node, center, extent)?;
                }
                Ok(())
            }
            AnchorKind::Point => {
                let placement = self.interaction.on_anchor_confirmed(
                    node,
                    SceneContext {
                        tracker: &mut self.tracker,
                        registry: &mut self.registry,
                        measurement: &mut self.measurement,
                        models: &self.models,
                        marker_radius: self.config.measurement.marker_radius,
                    },
                )?;
                if let Placement::Marker(_) = placement {
                    self.sync_distance();
                }
                Ok(())
            }
        }
    }

    pub fn on_anchor_updated(&mut self, anchor: &Anchor, node: NodeId) -> Result<()> {
        match anchor.kind {
            AnchorKind::Plane { center, extent } => {
                self.planes.update(&mut self.tracker, anchor.id, center, extent);
                Ok(())
            }
            AnchorKind::Point => {
                if self.interaction.mode() == &InteractionMode::Measuring && self.measurement.tracks(node) {
                    self.measurement.refresh(&mut self.tracker, &mut self.registry)?;
                    self.sync_distance();
                }
                Ok(())
            }
        }
    }

    pub fn on_anchor_removed(&mut self, anchor: &Anchor, node: NodeId) {
        if anchor.is_plane() {
            self.planes.remove(&mut self.tracker, anchor.id, node);
        }
    }

    /// Per-frame refresh of the message, tracking line and reticle
    pub fn on_frame_advanced(&mut self, now: Instant) {
        self.presentation.message.expire(now);

        if let Some(state) = self.tracker.tracking_state() {
            self.presentation.tracking = state.label().to_string();
        }

        let center = self.config.ui.viewport.center();
        let on_plane = !self
            .tracker
            .hit_test(center, HitTestKind::ExistingPlaneUsingExtent)
            .is_empty();
        self.presentation.reticle = if on_plane { Reticle::Green } else { Reticle::Gray };
    }

    /// Request an anchor where the screen center meets the world
    ///
    /// The nearest plane hit wins; without one, the farthest feature point is
    /// used. Returns the requested anchor, if anything was hit.
    pub fn on_touch_confirmed(&mut self) -> Result<Option<AnchorId>> {
        let center = self.config.ui.viewport.center();

        let hit = self
            .tracker
            .hit_test(center, HitTestKind::ExistingPlaneUsingExtent)
            .first()
            .copied()
            .or_else(|| {
                self.tracker
                    .hit_test(center, HitTestKind::FeaturePoint)
                    .last()
                    .copied()
            });

        let Some(hit) = hit else {
            debug!("touch hit nothing");
            return Ok(None);
        };

        match self.tracker.add_anchor(hit.world_transform) {
            Ok(anchor) => {
                debug!(%anchor, distance = hit.distance, "anchor requested");
                Ok(Some(anchor))
            }
            Err(Error::Interruption(reason)) => {
                debug!(%reason, "touch ignored while tracking is interrupted");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// React to one of the on-screen controls
    pub fn select(&mut self, control: Control, now: Instant) -> Result<()> {
        match control {
            Control::PlaceModelA => {
                let model_id = self.config.models.primary.id.clone();
                self.set_mode(InteractionMode::Placing(model_id));
                self.presentation.controls.select(control);
            }
            Control::PlaceModelB => {
                let model_id = self.config.models.secondary.id.clone();
                self.set_mode(InteractionMode::Placing(model_id));
                self.presentation.controls.select(control);
            }
            Control::Measure => {
                self.set_mode(InteractionMode::Measuring);
                self.presentation.controls.select(control);
            }
            Control::Reset => {
                self.clear_session();
                self.set_mode(InteractionMode::Idle);
                self.presentation.distance.reset();
                self.presentation.controls.deselect_all();
                if self.config.restart_tracking_on_reset {
                    self.planes.forget();
                    self.restart_session(now)?;
                }
            }
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        let previous = self.interaction.set_mode(mode);
        if previous == InteractionMode::Measuring && self.interaction.mode() != &InteractionMode::Measuring {
            self.measurement.clear(&mut self.tracker, &mut self.registry);
            self.sync_distance();
        }
    }

    /// Rerun tracking with anchors and tracking reset. A refusal from the
    /// framework is shown like any other session failure.
    fn restart_session(&mut self, now: Instant) -> Result<()> {
        match self.tracker.run_session(&self.config.session, RunOptions::reset()) {
            Err(Error::SessionFailure(description)) => {
                self.on_session_failed(description, now);
                Ok(())
            }
            other => other,
        }
    }

    fn clear_session(&mut self) {
        self.registry.clear(&mut self.tracker);
        self.measurement.forget();
        self.sync_distance();
    }

    fn sync_distance(&mut self) {
        self.presentation.distance.sync(self.measurement.current());
    }

    fn show_message(&mut self, text: impl Into<String>, now: Instant) {
        let duration = self.config.ui.message_duration();
        self.presentation.message.show(text, now, duration);
    }

    pub fn presentation(&self) -> &PresentationState {
        &self.presentation
    }

    pub fn mode(&self) -> &InteractionMode {
        self.interaction.mode()
    }

    pub fn registry(&self) -> &SessionNodeRegistry {
        &self.registry
    }

    pub fn measurement(&self) -> &MeasurementEngine {
        &self.measurement
    }

    pub fn planes(&self) -> &PlaneRecords {
        &self.planes
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }
}
