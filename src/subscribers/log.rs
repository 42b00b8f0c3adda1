//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [connected]
//! [starting] task=recv
//! [failed] task=send err="send loop not provided; ..."
//! [stop-requested]
//! [stop-sent] task=recv
//! [already-stopped] task=send
//! [all-stopped]
//! [transport-closed]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber, enabled via the `logging` feature.
///
/// Meant for development and demos; implement a custom [`Subscribe`] for
/// structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Connected => println!("[connected]"),
            EventKind::TaskStarting => {
                if let Some(task) = &e.task {
                    println!("[starting] task={task}");
                }
            }
            EventKind::TaskStopped => {
                if let Some(task) = &e.task {
                    println!("[stopped] task={task}");
                }
            }
            EventKind::TaskFailed => {
                println!("[failed] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::TriggerFallback => {
                println!("[trigger-fallback] {:?}", e.reason);
            }
            EventKind::StopRequested => println!("[stop-requested]"),
            EventKind::StopSignaled => {
                println!("[stop-sent] task={:?}", e.task);
            }
            EventKind::StopSkipped => {
                println!("[already-stopped] task={:?}", e.task);
            }
            EventKind::AllStoppedWithin => println!("[all-stopped]"),
            EventKind::GraceExceeded => println!("[grace-exceeded]"),
            EventKind::TransportClosed => match &e.reason {
                Some(reason) => println!("[transport-closed] {reason}"),
                None => println!("[transport-closed]"),
            },
        }
    }
}
