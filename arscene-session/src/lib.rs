//! Touch interaction, measurement and presentation for an AR session
//!
//! The host framework does the tracking, plane detection, hit-testing and
//! rendering; this crate decides what a touch means and keeps track of what
//! the application put into the scene:
//! - [`InteractionStateMachine`]: idle, placing a model, or measuring
//! - [`SessionNodeRegistry`]: nodes to detach when the session is cleared
//! - [`MeasurementEngine`]: distance between the two latest measurement points
//! - [`PresentationAdapter`]: routes framework callbacks to all of the above
//!
//! The framework is reached only through the [`Tracker`] port, and its
//! callbacks arrive as [`FrameworkEvent`]s marshaled through
//! [`dispatch::channel`]. [`sim::SimulatedTracker`] implements the port in
//! memory.

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod interaction;
pub mod measurement;
pub mod planes;
pub mod port;
pub mod presentation;
pub mod registry;
pub mod sim;

pub use adapter::PresentationAdapter;
pub use config::{AppConfig, ModelSpec, SessionConfig};
pub use dispatch::{channel, EventSender, FrameworkEvent, MainQueue};
pub use interaction::{Control, InteractionMode, InteractionStateMachine, Placement};
pub use measurement::{Measurement, MeasurementEngine, MeasurementPoint};
pub use port::{Anchor, AnchorId, AnchorKind, HitResult, HitTestKind, LimitedReason, RunOptions, Tracker, TrackingState};
pub use presentation::{PresentationState, Reticle};
pub use registry::SessionNodeRegistry;
