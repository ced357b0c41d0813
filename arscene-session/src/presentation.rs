//! User-facing state: message line, tracking line, distance readout,
//! reticle and control selection
//!
//! Only the presentation adapter mutates this; everything else reads it.

use crate::interaction::Control;
use crate::measurement::Measurement;
use arscene_core::Color;
use std::time::{Duration, Instant};

/// A transient message that clears itself after a while
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLine {
    text: String,
    expires_at: Option<Instant>,
}

impl MessageLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show `text` until `now + duration`, superseding any current message.
    /// A deadline past what `Instant` can hold never expires.
    pub(crate) fn show(&mut self, text: impl Into<String>, now: Instant, duration: Duration) {
        self.text = text.into();
        self.expires_at = now.checked_add(duration);
    }

    /// Clear the message if its time is up
    pub(crate) fn expire(&mut self, now: Instant) {
        if self.expires_at.is_some_and(|deadline| now >= deadline) {
            self.text.clear();
            self.expires_at = None;
        }
    }
}

/// Distance readout, visible only while a measurement is live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceReadout {
    text: String,
    visible: bool,
}

impl DistanceReadout {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mirror the measurement engine's current reading
    ///
    /// The last text is kept while hidden, matching the on-screen label that
    /// is merely hidden between measurements.
    pub(crate) fn sync(&mut self, reading: Option<&Measurement>) {
        match reading {
            Some(measurement) => {
                self.text = measurement.label();
                self.visible = true;
            }
            None => self.visible = false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.text.clear();
        self.visible = false;
    }
}

/// Center reticle color, encoding hit-test quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reticle {
    /// Only feature points, or nothing, under the center
    #[default]
    Gray,
    /// An existing plane is under the center
    Green,
}

impl Reticle {
    pub fn color(&self) -> Color {
        match self {
            Reticle::Gray => Color::GRAY,
            Reticle::Green => Color::GREEN,
        }
    }
}

/// Selection state of the mutually exclusive controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlBar {
    selected: Option<Control>,
}

impl ControlBar {
    pub fn selected(&self) -> Option<Control> {
        self.selected
    }

    pub fn is_selected(&self, control: Control) -> bool {
        self.selected == Some(control)
    }

    pub(crate) fn select(&mut self, control: Control) {
        self.selected = Some(control);
    }

    pub(crate) fn deselect_all(&mut self) {
        self.selected = None;
    }
}

/// Everything shown on screen around the camera feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    pub(crate) message: MessageLine,
    pub(crate) tracking: String,
    pub(crate) distance: DistanceReadout,
    pub(crate) reticle: Reticle,
    pub(crate) controls: ControlBar,
}

impl PresentationState {
    pub fn message(&self) -> &str {
        self.message.text()
    }

    pub fn tracking(&self) -> &str {
        &self.tracking
    }

    pub fn distance(&self) -> &DistanceReadout {
        &self.distance
    }

    pub fn reticle(&self) -> Reticle {
        self.reticle
    }

    pub fn controls(&self) -> &ControlBar {
        &self.controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arscene_core::Point3f;

    #[test]
    fn test_message_expires() {
        let start = Instant::now();
        let mut line = MessageLine::default();
        line.show("Session Interrupted", start, Duration::from_secs(2));

        line.expire(start + Duration::from_secs(1));
        assert_eq!(line.text(), "Session Interrupted");

        line.expire(start + Duration::from_secs(2));
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_newer_message_supersedes() {
        let start = Instant::now();
        let mut line = MessageLine::default();
        line.show("Session Interrupted", start, Duration::from_secs(2));
        line.show("Resuming Session...", start + Duration::from_secs(1), Duration::from_secs(2));

        // The first message's deadline no longer clears the line
        line.expire(start + Duration::from_secs(2));
        assert_eq!(line.text(), "Resuming Session...");

        line.expire(start + Duration::from_secs(3));
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_unbounded_message_stays_up() {
        let start = Instant::now();
        let mut line = MessageLine::default();
        line.show("Session Interrupted", start, Duration::MAX);

        line.expire(start + Duration::from_secs(3600));
        assert_eq!(line.text(), "Session Interrupted");
    }

    #[test]
    fn test_distance_readout_sync() {
        let mut readout = DistanceReadout::default();
        assert!(!readout.is_visible());

        let reading = Measurement::between(Point3f::origin(), Point3f::new(0.0, 0.0, 1.5));
        readout.sync(Some(&reading));
        assert!(readout.is_visible());
        assert_eq!(readout.text(), "Distance: 1.50 meters.");

        readout.sync(None);
        assert!(!readout.is_visible());

        readout.reset();
        assert_eq!(readout.text(), "");
    }

    #[test]
    fn test_control_bar_is_exclusive() {
        let mut bar = ControlBar::default();
        bar.select(Control::Measure);
        bar.select(Control::PlaceModelB);

        assert!(bar.is_selected(Control::PlaceModelB));
        assert!(!bar.is_selected(Control::Measure));

        bar.deselect_all();
        assert_eq!(bar.selected(), None);
    }

    #[test]
    fn test_reticle_colors() {
        assert_eq!(Reticle::default(), Reticle::Gray);
        assert_eq!(Reticle::Green.color(), Color::GREEN);
    }
}
