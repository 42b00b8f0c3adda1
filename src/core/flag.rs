//! # Liveness flag: the cooperative stop signal.
//!
//! One [`LivenessFlag`] exists per registered task. The owning task polls it
//! every loop iteration; the shutdown task (or the owner itself, on an
//! unrecoverable error) stops it. Stopping is terminal: there is no way to
//! set a stopped flag alive again.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cooperative stop signal plus poll interval for one task.
///
/// Clones share state: the registry keeps one clone for the shutdown
/// cascade, the owning task holds another inside its context.
///
/// No further locking: stop is an idempotent one-way transition, so a racing
/// reader at worst observes the old value for one poll interval.
#[derive(Clone, Debug)]
pub struct LivenessFlag {
    stop: CancellationToken,
    poll_interval: Duration,
}

impl LivenessFlag {
    /// Creates an alive flag with the given poll interval.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            stop: CancellationToken::new(),
            poll_interval,
        }
    }

    /// True until [`stop`](Self::stop) is called.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.stop.is_cancelled()
    }

    /// Signals the owning task to stop. Terminal and idempotent.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// The task's sleep interval between loop iterations.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Suspends for one poll interval.
    pub async fn tick(&self) {
        tokio::time::sleep(self.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flag_is_alive() {
        let flag = LivenessFlag::new(Duration::from_millis(10));
        assert!(flag.is_alive());
        assert_eq!(flag.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_stop_is_terminal_and_idempotent() {
        let flag = LivenessFlag::new(Duration::from_millis(10));
        flag.stop();
        assert!(!flag.is_alive());
        flag.stop();
        assert!(!flag.is_alive());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = LivenessFlag::new(Duration::from_millis(10));
        let other = flag.clone();
        other.stop();
        assert!(!flag.is_alive());
    }
}
