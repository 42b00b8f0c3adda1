//! # Per-task execution context.
//!
//! [`TaskContext`] is what a task body gets instead of ambient client state:
//! its own liveness flag, the shared transport handle, and a read handle to
//! the last-received mailbox.

use std::sync::Arc;

use tokio::sync::watch;

use crate::core::LivenessFlag;
use crate::transport::Transport;

/// Everything one task needs for one run.
///
/// Cloneable; every task receives its own context built at launch time.
#[derive(Clone)]
pub struct TaskContext {
    flag: LivenessFlag,
    link: Arc<dyn Transport>,
    last: watch::Receiver<Vec<u8>>,
}

impl TaskContext {
    pub(crate) fn new(
        flag: LivenessFlag,
        link: Arc<dyn Transport>,
        last: watch::Receiver<Vec<u8>>,
    ) -> Self {
        Self { flag, link, last }
    }

    /// The task's own liveness flag.
    pub fn flag(&self) -> &LivenessFlag {
        &self.flag
    }

    /// True while this task should keep looping.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.flag.is_alive()
    }

    /// Stops this task's own flag (terminal).
    ///
    /// Used by a task that hits an unrecoverable error; it does not affect
    /// any other task.
    pub fn stop(&self) {
        self.flag.stop();
    }

    /// Suspends for one poll interval. The cooperative suspension point:
    /// call it exactly once per loop iteration.
    pub async fn tick(&self) {
        self.flag.tick().await;
    }

    /// Shared handle to the open transport.
    ///
    /// The design expects exactly one writer task (send) and one reader task
    /// (recv); concurrent writers are a caller error.
    pub fn link(&self) -> &Arc<dyn Transport> {
        &self.link
    }

    /// Returns a copy of the most recent inbound frame.
    ///
    /// Single-slot mailbox, last-write-wins: readers that poll slower than
    /// frames arrive silently miss intermediate messages. Empty until the
    /// first frame is received.
    pub fn last_received(&self) -> Vec<u8> {
        self.last.borrow().clone()
    }
}
