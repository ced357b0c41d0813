//! Two-point distance measurement
//!
//! Confirmed measurement anchors enter a window of at most two points. A
//! full window publishes the distance between its points and a connecting
//! line; a third point evicts the settled pair and starts the next one.

use crate::port::Tracker;
use crate::registry::SessionNodeRegistry;
use arscene_core::factory::line_node;
use arscene_core::{distance, format_meters, NodeId, Point3f, Result};
use tracing::{debug, info, warn};

/// Number of points a measurement is taken between
pub const WINDOW_SIZE: usize = 2;

/// A confirmed measurement endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementPoint {
    /// Framework node of the anchor; its position is the endpoint
    pub anchor_node: NodeId,
    /// Marker sphere attached under the anchor node
    pub marker: NodeId,
}

/// Distance between the two points of a full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub from: Point3f,
    pub to: Point3f,
    /// Meters
    pub distance: f32,
}

impl Measurement {
    pub fn between(from: Point3f, to: Point3f) -> Self {
        Self {
            from,
            to,
            distance: distance(&from, &to),
        }
    }

    /// Distance with two fractional digits, e.g. `1.50`
    pub fn value(&self) -> String {
        format_meters(self.distance)
    }

    /// Text for the distance readout
    pub fn label(&self) -> String {
        format!("Distance: {} meters.", self.value())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasurementEngine {
    window: Vec<MeasurementPoint>,
    line: Option<NodeId>,
    current: Option<Measurement>,
}

impl MeasurementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a confirmed point and settle the window
    ///
    /// A third point detaches the two oldest points and their line, leaving
    /// only the newest one.
    pub fn push<T: Tracker + ?Sized>(
        &mut self,
        point: MeasurementPoint,
        tracker: &mut T,
        registry: &mut SessionNodeRegistry,
    ) -> Result<()> {
        self.window.push(point);

        if self.window.len() > WINDOW_SIZE {
            let evicted: Vec<MeasurementPoint> = self.window.drain(..WINDOW_SIZE).collect();
            for old in &evicted {
                registry.remove_from_app_scope(tracker, old.marker);
                tracker.detach(old.anchor_node);
            }
            info!(evicted = evicted.len(), "started a new measurement");
        }

        self.refresh(tracker, registry)
    }

    /// Recompute distance and line from the points' current positions
    pub fn refresh<T: Tracker + ?Sized>(
        &mut self,
        tracker: &mut T,
        registry: &mut SessionNodeRegistry,
    ) -> Result<()> {
        if self.window.len() != WINDOW_SIZE {
            self.remove_line(tracker, registry);
            self.current = None;
            return Ok(());
        }

        let (first, second) = (self.window[0], self.window[1]);
        let (Some(from), Some(to)) = (
            tracker.world_position(first.anchor_node),
            tracker.world_position(second.anchor_node),
        ) else {
            warn!(
                from = %first.anchor_node,
                to = %second.anchor_node,
                "measurement endpoint is not in the scene, keeping last reading"
            );
            return Ok(());
        };

        self.remove_line(tracker, registry);
        let line = tracker.attach(None, line_node(from, to))?;
        registry.register(line);
        self.line = Some(line);

        let measurement = Measurement::between(from, to);
        debug!(distance = measurement.distance, "measurement updated");
        self.current = Some(measurement);
        Ok(())
    }

    /// Drop the window and detach the connecting line; markers stay placed
    pub fn clear<T: Tracker + ?Sized>(&mut self, tracker: &mut T, registry: &mut SessionNodeRegistry) {
        self.window.clear();
        self.remove_line(tracker, registry);
        self.current = None;
    }

    /// Forget all state without touching the scene, for use after the
    /// registry has already been cleared
    pub fn forget(&mut self) {
        self.window.clear();
        self.line = None;
        self.current = None;
    }

    /// Whether `node` is the anchor node of a point in the window
    pub fn tracks(&self, node: NodeId) -> bool {
        self.window.iter().any(|point| point.anchor_node == node)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.window
    }

    /// Connecting line of the current pair
    pub fn line(&self) -> Option<NodeId> {
        self.line
    }

    /// Reading for the current pair; present only while the window is full
    pub fn current(&self) -> Option<&Measurement> {
        self.current.as_ref()
    }

    fn remove_line<T: Tracker + ?Sized>(&mut self, tracker: &mut T, registry: &mut SessionNodeRegistry) {
        if let Some(line) = self.line.take() {
            registry.remove_from_app_scope(tracker, line);
        }
    }
}
