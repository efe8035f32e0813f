//! One accepted TCP peer: non-blocking socket + receive buffer.
//!
//! All I/O here is polling, never blocking: `read_messages` drains whatever
//! bytes the kernel already has and returns immediately, and writes that
//! cannot complete mark the connection failed instead of waiting.  A failed
//! or closed connection is not torn down here — the server notices the
//! status on its next tick, emits `client_disconnected`, and removes the
//! entry from its list.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

use tracing::{debug, warn};

use scenebridge_core::FrameBuffer;

/// Socket status as observed by the per-tick poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Peer is connected and readable.
    Open,
    /// Peer closed the connection (read returned EOF).
    Closed,
    /// A read or write failed; the socket is unusable.
    Error,
}

/// One accepted peer with its own accumulation buffer.
///
/// Owned exclusively by the server's connection list; nothing else holds a
/// reference to it.
pub struct Connection {
    stream: TcpStream,
    status: ConnectionStatus,
    frame: FrameBuffer,
    peer_addr: Option<SocketAddr>,
}

impl Connection {
    /// Wraps a freshly accepted stream, switching it to non-blocking mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if non-blocking mode cannot be set.
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        let peer_addr = stream.peer_addr().ok();
        Ok(Self {
            stream,
            status: ConnectionStatus::Open,
            frame: FrameBuffer::new(),
            peer_addr,
        })
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == ConnectionStatus::Open
    }

    /// Peer address, when the socket could report one at accept time.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Drains every byte currently available and returns the complete
    /// messages extracted from the buffer, oldest first.
    ///
    /// Returns immediately when the kernel has nothing buffered.  EOF marks
    /// the connection `Closed`; any other read failure marks it `Error`.
    /// Messages extracted before the failure are still returned.
    pub fn read_messages(&mut self) -> Vec<String> {
        let mut chunk = [0u8; 4096];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    self.status = ConnectionStatus::Closed;
                    break;
                }
                Ok(n) => self.frame.push_bytes(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(peer = ?self.peer_addr, error = %e, "connection read failed");
                    self.status = ConnectionStatus::Error;
                    break;
                }
            }
        }
        self.frame.drain_messages()
    }

    /// Writes one already-serialized, newline-terminated line.
    ///
    /// Best effort: on failure (including a full kernel send buffer) the
    /// connection is marked `Error` and the line is dropped; the server
    /// cleans the entry up on a later tick.  Never blocks.
    pub fn send_line(&mut self, line: &str) {
        if self.status != ConnectionStatus::Open {
            return;
        }
        if let Err(e) = self.stream.write_all(line.as_bytes()) {
            warn!(peer = ?self.peer_addr, error = %e, "connection write failed");
            self.status = ConnectionStatus::Error;
        }
    }
}
