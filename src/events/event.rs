//! # Runtime events emitted by the supervisor and its tasks.
//!
//! [`EventKind`] classifies events across the run lifecycle: connection,
//! per-task start/stop/failure, and the shutdown cascade. The [`Event`]
//! struct carries optional metadata (task name, reason).
//!
//! ## Ordering
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically; use it to restore order when events are observed out of
//! band.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Connection ===
    /// Transport connected and the handshake frame was written.
    Connected,

    /// The terminal CLOSE frame was attempted and the transport closed.
    ///
    /// Sets `reason` when the CLOSE write or the close itself failed
    /// (best-effort; never escalated).
    TransportClosed,

    // === Task lifecycle ===
    /// A task's loop is starting. Sets `task`.
    TaskStarting,

    /// A task's loop finished cleanly. Sets `task`.
    TaskStopped,

    /// A task's loop exited with an error. Sets `task` and `reason`.
    ///
    /// Task failures are local: they never cascade by themselves.
    TaskFailed,

    // === Shutdown cascade ===
    /// The stop trigger could not be queried; stopping after the fixed
    /// fallback delay instead. Sets `reason`.
    TriggerFallback,

    /// The shutdown task observed its trigger and is starting the cascade.
    StopRequested,

    /// A flag that was still alive has been signaled to stop. Sets `task`.
    StopSignaled,

    /// A flag that had already stopped on its own was skipped. Sets `task`.
    StopSkipped,

    /// Every task in the join set exited within the grace period.
    AllStoppedWithin,

    /// The grace period elapsed with tasks still running; they were
    /// abandoned and their results ignored.
    GraceExceeded,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, fallback details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Connected);
        let b = Event::new(EventKind::Connected);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::TaskFailed)
            .with_task("recv")
            .with_reason("boom");
        assert_eq!(ev.kind, EventKind::TaskFailed);
        assert_eq!(ev.task.as_deref(), Some("recv"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
