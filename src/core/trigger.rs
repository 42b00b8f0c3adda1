//! # External stop trigger.
//!
//! The shutdown task polls a [`StopTrigger`] every loop iteration: "has the
//! user requested quit". The trigger is an opaque external collaborator; if
//! it cannot be queried at all, the shutdown task falls back to an
//! unconditional fixed delay and stops anyway.
//!
//! Two implementations ship with the crate:
//! - [`SignalTrigger`] — OS termination signals, the default.
//! - [`ManualTrigger`] — an externally set flag, for keypress detectors and
//!   tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// The trigger mechanism itself is broken or unavailable.
#[derive(Error, Debug)]
#[error("stop trigger unavailable: {reason}")]
pub struct TriggerError {
    /// Why the trigger cannot be queried.
    pub reason: String,
}

/// Boolean-producing poll: is stop requested now?
///
/// Polled synchronously once per shutdown-task loop iteration. Returning
/// `Err` means the mechanism cannot be queried at all; the shutdown task
/// then waits the configured fallback delay and proceeds to stop regardless.
pub trait StopTrigger: Send + Sync + 'static {
    /// Returns whether stop has been requested.
    fn is_requested(&self) -> Result<bool, TriggerError>;
}

/// Stop trigger backed by OS termination signals.
///
/// Unix: SIGINT (Ctrl-C), SIGTERM, SIGQUIT. Windows: Ctrl-C. The listener
/// runs on a background task; once a signal arrives every subsequent poll
/// returns `true`.
pub struct SignalTrigger {
    requested: Arc<AtomicBool>,
    broken: Arc<AtomicBool>,
}

impl SignalTrigger {
    /// Installs the signal listener. Must be called within a runtime.
    pub fn spawn() -> Self {
        let requested = Arc::new(AtomicBool::new(false));
        let broken = Arc::new(AtomicBool::new(false));
        let req = requested.clone();
        let brk = broken.clone();
        tokio::spawn(async move {
            match wait_for_termination_signal().await {
                Ok(()) => req.store(true, Ordering::SeqCst),
                Err(_) => brk.store(true, Ordering::SeqCst),
            }
        });
        Self { requested, broken }
    }
}

impl StopTrigger for SignalTrigger {
    fn is_requested(&self) -> Result<bool, TriggerError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(TriggerError {
                reason: "signal listener registration failed".to_string(),
            });
        }
        Ok(self.requested.load(Ordering::SeqCst))
    }
}

/// Stop trigger set explicitly from outside.
///
/// Hand a clone to whatever detects the quit gesture (a keypress watcher, a
/// UI button) and call [`request_stop`](ManualTrigger::request_stop) from it.
#[derive(Clone, Default)]
pub struct ManualTrigger {
    requested: Arc<AtomicBool>,
}

impl ManualTrigger {
    /// Creates a trigger that has not fired yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the supervised run to stop. Idempotent.
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

impl StopTrigger for ManualTrigger {
    fn is_requested(&self) -> Result<bool, TriggerError> {
        Ok(self.requested.load(Ordering::SeqCst))
    }
}

/// Completes when the process receives a termination signal.
#[cfg(unix)]
async fn wait_for_termination_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Completes when the process receives a termination signal.
#[cfg(not(unix))]
async fn wait_for_termination_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_trigger_fires_once_set() {
        let trigger = ManualTrigger::new();
        assert!(!trigger.is_requested().unwrap());
        trigger.request_stop();
        assert!(trigger.is_requested().unwrap());
        // stays requested
        assert!(trigger.is_requested().unwrap());
    }
}
