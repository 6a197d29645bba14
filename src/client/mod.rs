//! The HTTP/1.x client protocol implementation
//!
//! The client side of the crate: a per-connection state machine that
//! sends requests over a byte transport and parses the responses, and
//! a `Proto` future dispatching them to an application `Handler`.

mod config;
mod conn;
mod proto;

pub use self::conn::{Event, HttpConnection};
pub use self::proto::Proto;

use limits::Limits;

/// Fine-grained configuration of the HTTP client
#[derive(Debug, Clone)]
pub struct Config {
    limits: Limits,
    concatenate_chunks: bool,
}

/// The application callback surface of a client connection.
///
/// Only `on_response` is mandatory. Handlers that want chunk-by-chunk
/// delivery implement `on_chunk` and disable `concatenate_chunks` in
/// the `Config`.
pub trait Handler<S> {
    /// A response was received.
    ///
    /// For chunked responses in progressive mode this fires once when
    /// the response head is parsed, and the body follows through
    /// `on_chunk`; otherwise it fires with the complete body.
    fn on_response(&mut self, conn: &mut HttpConnection<S>);

    /// A chunk of a chunked response was received (progressive mode).
    fn on_chunk(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// A malformed response was received. The connection is rarely
    /// recoverable; most clients disconnect here.
    fn on_invalid_response(&mut self, conn: &mut HttpConnection<S>) {
        conn.disconnect();
    }

    /// The transport reported the connection established.
    fn on_connected(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// The connection is gone.
    fn on_disconnected(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// A queued message was fully handed to the transport.
    fn on_message_sent(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }
}
