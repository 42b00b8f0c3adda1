//! Error types used by the poselink runtime and tasks.
//!
//! The taxonomy follows the layer boundaries:
//!
//! - [`TransportError`] — connection-level failures (dial, frame I/O, close).
//! - [`RegistryError`] — registration-time programmer errors, raised
//!   synchronously to the caller.
//! - [`TaskError`] — errors local to one task's loop; never cascade on their own.
//! - [`RuntimeError`] — the only errors [`Supervisor::run`](crate::Supervisor::run)
//!   returns: failures before any task has started.

use thiserror::Error;

/// Errors produced by the transport adapter.
///
/// [`TransportError::Connect`] during startup is fatal to the whole run
/// (nothing has started yet). [`TransportError::Read`] is local to the recv
/// task: it stops its own flag and exits. Write/close failures during
/// shutdown are reported, never escalated.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to open the connection.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Address the dial was attempted against (host:port).
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Frame read failed: peer disconnect, I/O error, or a malformed frame.
    #[error("read failed: {reason}")]
    Read {
        /// Human-readable failure detail.
        reason: String,
    },

    /// Frame write failed.
    #[error("write failed: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Closing the connection failed (the peer may already be gone).
    #[error("close failed: {source}")]
    Close {
        #[source]
        source: std::io::Error,
    },
}

/// Registration-time errors.
///
/// All three are programmer errors surfaced loudly at the call site. The only
/// silent path is the [`TaskSet`](crate::TaskSet) one, which skips reserved
/// names instead of failing (see [`TaskRegistry`](crate::TaskRegistry)).
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A task with this name is already registered.
    #[error("task {name:?} is already registered")]
    DuplicateTask {
        /// The offending task name.
        name: String,
    },

    /// The name is a lifecycle entry point and can never be a schedulable task.
    #[error("task name {name:?} is reserved")]
    ReservedName {
        /// The offending task name.
        name: String,
    },

    /// No task with this name exists.
    #[error("no task named {name:?}")]
    UnknownTask {
        /// The name that was looked up.
        name: String,
    },
}

/// Errors produced by one task's loop.
///
/// A failing task stops itself; it never takes the others down. Cascading
/// stop is solely the shutdown task's responsibility.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The abstract send task was run without being overridden.
    #[error("send loop not provided; supply one with `SupervisorBuilder::with_send`")]
    NotImplemented,

    /// Frame I/O failed inside the task loop.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Task-specific failure.
    #[error("{0}")]
    Fail(String),
}

/// Errors returned by [`Supervisor::run`](crate::Supervisor::run).
///
/// Both variants occur before any task has started, so no cleanup is needed:
/// the run aborts and the transport is never handed to anyone.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Dialing the server failed.
    #[error("connection failed: {0}")]
    Connect(#[source] TransportError),

    /// The connection opened but the identification frame could not be written.
    #[error("handshake failed: {0}")]
    Handshake(#[source] TransportError),
}
