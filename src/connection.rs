//! Transport-facing vocabulary shared by the server and client
//! connection state machines.
//!
//! The state machines themselves live in `server::conn` and
//! `client::conn`; this module holds the pieces that are identical on
//! both sides: the socket event taxonomy, the per-connection flag
//! block and the transmit entry serialization.

use std::io::Write;

use netbuf::Buf;

/// The default size of a connection receive buffer.
pub const DEFAULT_RX_BUFFER_SIZE: usize = 8192;

/// The lifecycle of a connection, derived from its flag block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// TLS handshake in progress (plain TCP connections skip this)
    Handshaking,
    /// connected and exchanging messages; reading and writing overlap
    Open,
    /// a graceful shutdown was issued, pending writes are draining
    ShuttingDown,
    /// the connection is finished
    Closed,
}

/// The per-connection flag block.
///
/// A `disconnect()` request is deferred until the transmit buffer
/// drains, then a graceful shutdown is issued; `shutdown_sent`
/// guarantees a peer-initiated shutdown is answered exactly once.
#[derive(Debug, Clone)]
pub struct Flags {
    /// the transport is connected
    pub connected: bool,
    /// a write is in flight
    pub transmitting: bool,
    /// shut the connection down once the current write completes
    pub disconnect_pending: bool,
    /// a shutdown has been sent to the peer
    pub shutdown_sent: bool,
    /// the connection is fully closed
    pub closed: bool,
}

impl Flags {
    pub fn new() -> Flags {
        Flags {
            connected: false,
            transmitting: false,
            disconnect_pending: false,
            shutdown_sent: false,
            closed: false,
        }
    }

    /// The lifecycle state the flags encode.
    pub fn state(&self) -> ConnState {
        if self.closed {
            ConnState::Closed
        } else if self.shutdown_sent || self.disconnect_pending {
            ConnState::ShuttingDown
        } else if self.connected {
            ConnState::Open
        } else {
            ConnState::Handshaking
        }
    }

    /// Request a graceful disconnect.
    ///
    /// Returns true when the shutdown may proceed immediately; false
    /// when it was deferred behind an in-flight write.
    pub fn request_disconnect(&mut self) -> bool {
        if self.transmitting {
            self.disconnect_pending = true;
            false
        } else {
            self.shutdown_sent = true;
            true
        }
    }
}

/// One entry of a connection transmit queue: a serialized message
/// head, optional body bytes and an optional CRLF tail (used after
/// chunk data).
#[derive(Debug, Clone)]
pub struct TxEntry {
    pub header: String,
    pub body: Option<Vec<u8>>,
    pub crlf_tail: bool,
}

impl TxEntry {
    pub fn head(header: String) -> TxEntry {
        TxEntry { header: header, body: None, crlf_tail: false }
    }

    pub fn with_body(header: String, body: Vec<u8>) -> TxEntry {
        TxEntry { header: header, body: Some(body), crlf_tail: false }
    }

    pub fn chunk(header: String, body: Vec<u8>) -> TxEntry {
        TxEntry { header: header, body: Some(body), crlf_tail: true }
    }

    /// Serialize the entry into an output buffer.
    pub fn write_to(&self, buf: &mut Buf) {
        buf.write_all(self.header.as_bytes())
            .expect("writing to a buffer always succeeds");
        if let Some(ref body) = self.body {
            buf.write_all(body)
                .expect("writing to a buffer always succeeds");
        }
        if self.crlf_tail {
            buf.write_all(b"\r\n")
                .expect("writing to a buffer always succeeds");
        }
    }
}
