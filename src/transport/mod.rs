//! # Transport adapter: the duplex frame-stream collaborator.
//!
//! The core treats the connection as an opaque duplex byte stream carrying
//! discrete frames. [`Dial`] opens it, [`Transport`] moves frames over it.
//!
//! ## Contract with the supervisor
//! - `dial` is called exactly once at startup; a failure there is fatal to
//!   the whole run (no retry).
//! - one handshake frame is written immediately after connecting,
//! - `close` is called exactly once at shutdown, after the terminal
//!   [`CLOSE_FRAME`], both best-effort.

mod tcp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

pub use tcp::{TcpDial, TcpTransport, FRAME_TERMINATOR};

/// Terminal frame written once during shutdown, before closing.
pub const CLOSE_FRAME: &[u8] = b"CLOSE";

/// Duplex frame stream.
///
/// Frame encoding is the adapter's business; the core only hands it payload
/// bytes. The design expects one writer task and one reader task; an adapter
/// may serialize concurrent calls but does not guard against interleaved
/// caller protocols.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Writes one frame.
    async fn write_frame(&self, frame: &[u8]) -> Result<(), TransportError>;

    /// Reads one frame, blocking until a full frame arrives.
    ///
    /// Fails with [`TransportError::Read`] on disconnect or a malformed
    /// frame.
    async fn read_frame(&self) -> Result<Vec<u8>, TransportError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Opens a [`Transport`] to a remote endpoint.
#[async_trait]
pub trait Dial: Send + Sync + 'static {
    /// Connects to `addr:port` and returns the open transport.
    async fn dial(&self, addr: &str, port: u16) -> Result<Arc<dyn Transport>, TransportError>;
}
