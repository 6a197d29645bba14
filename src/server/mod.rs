//! HTTP server protocol implementation
//!
//! The server side of the crate: a per-connection state machine that
//! parses requests off a byte transport and a `Proto` future that
//! dispatches them to an application `Handler`.

mod config;
mod conn;
mod index;
mod proto;

pub use self::conn::{Event, HttpConnection};
pub use self::index::ConnectionIndex;
pub use self::proto::Proto;

use limits::Limits;

/// Fine-grained configuration of the HTTP server
#[derive(Debug, Clone)]
pub struct Config {
    limits: Limits,
    translate_head_to_get: bool,
    trace_enabled: bool,
    auto_disconnect_on_invalid: bool,
    concatenate_chunks: bool,
}

/// The application callback surface of a server connection.
///
/// Only `on_request` is mandatory. The default `on_expect_continue`
/// acknowledges with `100 Continue`; the default `on_invalid` sends a
/// canned response carrying the receiver's computed status code and,
/// when configured, disconnects.
///
/// Handlers that want chunk-by-chunk delivery implement `on_chunk`
/// and disable `concatenate_chunks` in the `Config`.
pub trait Handler<S> {
    /// A complete, valid request was received.
    ///
    /// The request head and body are available from
    /// `conn.request()` / `conn.body()` until this callback returns.
    fn on_request(&mut self, conn: &mut HttpConnection<S>);

    /// A chunk of a chunked request was received (progressive mode).
    fn on_chunk(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// The client sent `Expect: 100-continue` and awaits the interim
    /// response.
    fn on_expect_continue(&mut self, conn: &mut HttpConnection<S>) {
        conn.send_continue();
    }

    /// A malformed request was received; `conn.response_code()` holds
    /// the status chosen by the receiver.
    fn on_invalid(&mut self, conn: &mut HttpConnection<S>) {
        conn.send_canned_response();
        if conn.config().auto_disconnect_on_invalid {
            conn.disconnect();
        }
    }

    /// The transport reported the connection established.
    fn on_socket_connected(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// The connection is gone.
    fn on_socket_disconnected(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }

    /// A queued message was fully handed to the transport.
    fn on_message_sent(&mut self, conn: &mut HttpConnection<S>) {
        let _ = conn;
    }
}
