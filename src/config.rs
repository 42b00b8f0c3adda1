//! # Global runtime configuration.
//!
//! [`Config`] centralizes the construction options of a supervisor. It is
//! consumed once by [`Supervisor::builder`](crate::Supervisor::builder); the
//! built-in tasks take their poll intervals from it.
//!
//! ## Field semantics
//! - `addr` / `port`: where to dial the pose server
//! - `send_interval` / `recv_interval`: poll intervals of the built-in send
//!   and recv tasks
//! - `shutdown_poll`: how often the shutdown task polls its stop trigger
//! - `grace`: bounded wait after the stop cascade before the transport closes
//! - `fallback_delay`: unconditional delay used when the stop trigger is
//!   unavailable
//! - `id_message`: identification string written right after connecting
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by the Bus)

use std::time::Duration;

/// Construction options for the supervisor runtime.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server address to connect to.
    pub addr: String,

    /// Server port to connect to.
    pub port: u16,

    /// Poll interval of the built-in send task.
    pub send_interval: Duration,

    /// Poll interval of the built-in recv task.
    pub recv_interval: Duration,

    /// Poll interval of the built-in shutdown task's trigger loop.
    pub shutdown_poll: Duration,

    /// Maximum wait after the stop cascade for tasks to observe their flags.
    ///
    /// Tasks that overrun the grace period are abandoned: their results are
    /// ignored and the transport is closed underneath them.
    pub grace: Duration,

    /// Delay before stopping anyway when the stop trigger cannot be queried.
    pub fallback_delay: Duration,

    /// Identification string sent as the handshake frame.
    pub id_message: String,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events skip
    /// the oldest items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the dial target as `host:port`.
    #[inline]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `addr = "127.0.0.1"`, `port = 6969`
    /// - `send_interval = 10ms`, `recv_interval = 1ms`
    /// - `shutdown_poll = 100ms`
    /// - `grace = 500ms`
    /// - `fallback_delay = 10s`
    /// - `id_message = "holla"`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            addr: "127.0.0.1".to_string(),
            port: 6969,
            send_interval: Duration::from_millis(10),
            recv_interval: Duration::from_millis(1),
            shutdown_poll: Duration::from_millis(100),
            grace: Duration::from_millis(500),
            fallback_delay: Duration::from_secs(10),
            id_message: "holla".to_string(),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_wire_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.addr, "127.0.0.1");
        assert_eq!(cfg.port, 6969);
        assert_eq!(cfg.send_interval, Duration::from_millis(10));
        assert_eq!(cfg.recv_interval, Duration::from_millis(1));
        assert_eq!(cfg.id_message, "holla");
        assert_eq!(cfg.endpoint(), "127.0.0.1:6969");
    }

    #[test]
    fn test_bus_capacity_clamped_to_one() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
