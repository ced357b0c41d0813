//! Marshaling framework callbacks onto the session's thread
//!
//! The framework may call back from its render thread. Callbacks are turned
//! into [`FrameworkEvent`]s and sent through an [`EventSender`]; the thread
//! that owns the session drains the [`MainQueue`] and handles them in order.
//! Session state is never touched from the sending side.

use crate::interaction::Control;
use crate::port::Anchor;
use arscene_core::NodeId;

/// Everything the host framework or the user can tell the session
#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkEvent {
    SessionFailed(String),
    SessionInterrupted,
    SessionInterruptionEnded,
    AnchorAdded { anchor: Anchor, node: NodeId },
    AnchorUpdated { anchor: Anchor, node: NodeId },
    AnchorRemoved { anchor: Anchor, node: NodeId },
    FrameAdvanced,
    TouchConfirmed,
    ControlPressed(Control),
}

/// Create a connected sender/queue pair
pub fn channel() -> (EventSender, MainQueue) {
    let (tx, rx) = flume::unbounded();
    (EventSender { tx }, MainQueue { rx })
}

/// Cloneable, thread-safe handle for posting events
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: flume::Sender<FrameworkEvent>,
}

impl EventSender {
    /// Post an event. Returns `false` once the queue has been dropped.
    pub fn send(&self, event: FrameworkEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Receiving end, owned by the session's thread
#[derive(Debug)]
pub struct MainQueue {
    rx: flume::Receiver<FrameworkEvent>,
}

impl MainQueue {
    /// Take every event posted so far, in arrival order, without blocking
    pub fn drain(&self) -> Vec<FrameworkEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
