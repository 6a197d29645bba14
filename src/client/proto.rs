//! The future driving one client connection.

use std::sync::Arc;

use futures::{Async, Future, Poll};
use tokio_io::{AsyncRead, AsyncWrite};
use url::Url;

use connection::ConnState;
use error::Error;
use client::conn::{Event, HttpConnection};
use client::{Config, Handler};

/// A future that runs the HTTP/1.x protocol on one client connection,
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
    /// config, the target url and the application handler.
    pub fn new(sock: S, cfg: &Arc<Config>, url: &Url, handler: H)
        -> Proto<S, H>
    {
        Proto {
            conn: HttpConnection::new(sock, cfg, url),
            handler: handler,
            connected_reported: false,
        }
    }

    /// The connection, for sending requests and out-of-band
    /// inspection.
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
            self.handler.on_connected(&mut self.conn);
        }
        loop {
            if self.conn.poll_write()? {
                self.handler.on_message_sent(&mut self.conn);
            }
            if self.conn.state() == ConnState::Closed {
                self.handler.on_disconnected(&mut self.conn);
                return Ok(Async::Ready(()));
            }
            match self.conn.poll_event()? {
                Async::Ready(Event::Disconnected) => {
                    self.handler.on_disconnected(&mut self.conn);
                    return Ok(Async::Ready(()));
                }
                Async::Ready(event) => {
                    match event {
                        Event::Response => {
                            self.handler.on_response(&mut self.conn);
                        }
                        Event::Chunk => {
                            self.handler.on_chunk(&mut self.conn);
                        }
                        Event::InvalidResponse => {
                            self.handler
                                .on_invalid_response(&mut self.conn);
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
