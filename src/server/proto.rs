//! The future driving one server connection.

use std::sync::Arc;

use futures::{Async, Future, Poll};
use tokio_io::{AsyncRead, AsyncWrite};

use connection::ConnState;
use error::Error;
use server::conn::{Event, HttpConnection};
use server::{Config, Handler};

/// A future that runs the HTTP/1.x protocol on one connection,
/// dispatching protocol events to the application `Handler`.
///
/// Resolves when the connection is closed, by either side.
pub struct Proto<S, H> {
    conn: HttpConnection<S>,
    handler: H,
    connected_reported: bool,
}

impl<S, H> Proto<S, H>
    where S: AsyncRead + AsyncWrite,
          H: Handler<S>,
{
    /// Create a new protocol future from a connected transport, a
    /// config and the application handler.
    pub fn new(sock: S, cfg: &Arc<Config>, handler: H) -> Proto<S, H> {
        Proto {
            conn: HttpConnection::new(sock, cfg),
            handler: handler,
            connected_reported: false,
        }
    }

    /// The connection, for out-of-band inspection.
    pub fn connection(&mut self) -> &mut HttpConnection<S> {
        &mut self.conn
    }
}

impl<S, H> Future for Proto<S, H>
    where S: AsyncRead + AsyncWrite,
          H: Handler<S>,
{
    type Item = ();
    type Error = Error;

    fn poll(&mut self) -> Poll<(), Error> {
        if !self.connected_reported {
            self.connected_reported = true;
            self.handler.on_socket_connected(&mut self.conn);
        }
        loop {
            if self.conn.poll_write()? {
                self.handler.on_message_sent(&mut self.conn);
            }
            if self.conn.state() == ConnState::Closed {
                self.handler.on_socket_disconnected(&mut self.conn);
                return Ok(Async::Ready(()));
            }
            match self.conn.poll_event()? {
                Async::Ready(Event::Disconnected) => {
                    self.handler.on_socket_disconnected(&mut self.conn);
                    return Ok(Async::Ready(()));
                }
                Async::Ready(event) => {
                    match event {
                        Event::Request => {
                            self.handler.on_request(&mut self.conn);
                        }
                        Event::Chunk => {
                            self.handler.on_chunk(&mut self.conn);
                        }
                        Event::ExpectContinue => {
                            self.handler
                                .on_expect_continue(&mut self.conn);
                        }
                        Event::InvalidRequest => {
                            self.handler.on_invalid(&mut self.conn);
                        }
                        Event::Disconnected => unreachable!(),
                    }
                    self.conn.finish_event(event);
                }
                Async::NotReady => {
                    if self.conn.poll_write()? {
                        self.handler.on_message_sent(&mut self.conn);
                        continue;
                    }
                    return Ok(Async::NotReady);
                }
            }
        }
    }
}
