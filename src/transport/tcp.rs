//! # TCP transport with terminator-delimited frames.
//!
//! The pose server protocol frames messages as raw payload bytes followed by
//! the three-byte terminator `\t\r\n`. Payloads may contain bare newlines;
//! only the full terminator ends a frame.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::TransportError;
use crate::transport::{Dial, Transport};

/// Frame terminator of the pose server wire protocol.
pub const FRAME_TERMINATOR: &[u8] = b"\t\r\n";

/// Dials a [`TcpTransport`].
pub struct TcpDial;

#[async_trait]
impl Dial for TcpDial {
    async fn dial(&self, addr: &str, port: u16) -> Result<Arc<dyn Transport>, TransportError> {
        let stream = TcpStream::connect((addr, port))
            .await
            .map_err(|source| TransportError::Connect {
                addr: format!("{addr}:{port}"),
                source,
            })?;
        // Pose frames are small and latency-sensitive.
        let _ = stream.set_nodelay(true);
        Ok(Arc::new(TcpTransport::new(stream)))
    }
}

/// Frame-delimited duplex stream over TCP.
///
/// Read and write halves sit behind independent async mutexes so the one
/// reader task and one writer task never contend with each other.
pub struct TcpTransport {
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpTransport {
    /// Wraps an already-connected stream.
    pub fn new(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: Mutex::new(BufReader::new(read)),
            writer: Mutex::new(write),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn write_frame(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(frame)
            .await
            .map_err(|source| TransportError::Write { source })?;
        writer
            .write_all(FRAME_TERMINATOR)
            .await
            .map_err(|source| TransportError::Write { source })?;
        writer
            .flush()
            .await
            .map_err(|source| TransportError::Write { source })?;
        Ok(())
    }

    async fn read_frame(&self) -> Result<Vec<u8>, TransportError> {
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        loop {
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| TransportError::Read {
                    reason: e.to_string(),
                })?;
            if n == 0 {
                return Err(TransportError::Read {
                    reason: if buf.is_empty() {
                        "connection closed by peer".to_string()
                    } else {
                        "connection closed mid-frame".to_string()
                    },
                });
            }
            if buf.ends_with(FRAME_TERMINATOR) {
                buf.truncate(buf.len() - FRAME_TERMINATOR.len());
                return Ok(buf);
            }
            // bare newline inside the payload; keep reading
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut writer = self.writer.lock().await;
        writer
            .shutdown()
            .await
            .map_err(|source| TransportError::Close { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn bound_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn test_frame_round_trip() {
        let (listener, port) = bound_listener().await;
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut got = Vec::new();
            while !got.ends_with(FRAME_TERMINATOR) {
                let mut byte = [0u8; 1];
                sock.read_exact(&mut byte).await.unwrap();
                got.push(byte[0]);
            }
            assert_eq!(&got[..got.len() - 3], b"holla");
            sock.write_all(b"pose 1.0 0.0\t\r\n").await.unwrap();
        });

        let transport = TcpDial.dial("127.0.0.1", port).await.unwrap();
        transport.write_frame(b"holla").await.unwrap();
        assert_eq!(transport.read_frame().await.unwrap(), b"pose 1.0 0.0");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_payload_may_contain_bare_newlines() {
        let (listener, port) = bound_listener().await;
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"line one\nline two\t\r\n").await.unwrap();
        });

        let transport = TcpDial.dial("127.0.0.1", port).await.unwrap();
        assert_eq!(transport.read_frame().await.unwrap(), b"line one\nline two");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_fails_on_peer_close() {
        let (listener, port) = bound_listener().await;
        let server = tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            drop(sock);
        });

        let transport = TcpDial.dial("127.0.0.1", port).await.unwrap();
        server.await.unwrap();
        let err = transport.read_frame().await.unwrap_err();
        assert!(matches!(err, TransportError::Read { .. }));
    }

    #[tokio::test]
    async fn test_dial_refused_is_connect_error() {
        let (listener, port) = bound_listener().await;
        drop(listener);
        let err = TcpDial.dial("127.0.0.1", port).await.err().unwrap();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
