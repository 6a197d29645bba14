//! The per-connection server protocol state machine.
//!
//! A connection owns its receive buffer, its request receiver and the
//! bytes of the response being transmitted. `poll_event` pushes
//! received bytes through the receiver and surfaces one protocol
//! event at a time; the `send_*` family serializes outgoing messages
//! into the write buffer.

use std::sync::Arc;

use futures::{Async, Poll};
use tk_bufstream::{IoBuf, ReadBuf, WriteBuf};
use tokio_io::{AsyncRead, AsyncWrite};

use chunked::{self, LastChunk, RxChunk};
use connection::{ConnState, Flags, TxEntry};
use error::Error;
use headers::Recv;
use request::{RequestReceiver, RxRequest};
use response::TxResponse;
use enums::Status;
use server::Config;

/// Protocol events surfaced by `HttpConnection::poll_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// a complete valid request (head and body) was received
    Request,
    /// a chunk of a chunked request was received (progressive mode)
    Chunk,
    /// the client awaits a `100 Continue` interim response
    ExpectContinue,
    /// a malformed request was received
    InvalidRequest,
    /// the connection is gone
    Disconnected,
}

/// A low-level HTTP/1.x server connection over a byte transport.
pub struct HttpConnection<S> {
    cin: ReadBuf<S>,
    cout: WriteBuf<S>,
    receiver: RequestReceiver,
    config: Arc<Config>,
    flags: Flags,
}

impl<S: AsyncRead + AsyncWrite> HttpConnection<S> {
    /// Wrap a connected transport into a server connection.
    pub fn new(sock: S, cfg: &Arc<Config>) -> HttpConnection<S> {
        let (cout, cin) = IoBuf::new(sock).split();
        let mut receiver = RequestReceiver::new(cfg.limits);
        receiver.set_translate_head(cfg.translate_head_to_get);
        receiver.set_concatenate_chunks(cfg.concatenate_chunks);
        receiver.set_trace_enabled(cfg.trace_enabled);
        let mut flags = Flags::new();
        flags.connected = true;
        HttpConnection {
            cin: cin,
            cout: cout,
            receiver: receiver,
            config: cfg.clone(),
            flags: flags,
        }
    }
}

impl<S> HttpConnection<S> {
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The lifecycle state of the connection.
    pub fn state(&self) -> ConnState {
        self.flags.state()
    }

    /// The request currently held by the receiver.
    pub fn request(&self) -> &RxRequest {
        self.receiver.request()
    }

    /// The body of the request currently held by the receiver.
    pub fn body(&self) -> &[u8] {
        self.receiver.body()
    }

    /// The chunk currently held by the receiver.
    pub fn chunk(&self) -> &RxChunk {
        self.receiver.chunk()
    }

    /// Whether the current request was originally a HEAD request.
    pub fn is_head(&self) -> bool {
        self.receiver.is_head()
    }

    /// The status the receiver chose for an invalid request, or
    /// `Continue` for an expect-continue handshake.
    pub fn response_code(&self) -> &Status {
        self.receiver.response_code()
    }

    /// The echo body for a TRACE response.
    pub fn trace_body(&self) -> Vec<u8> {
        self.receiver.trace_body()
    }

    /// Write the `100 Continue` interim response and remember that it
    /// was sent.
    pub fn send_continue(&mut self) {
        if self.flags.closed {
            return;
        }
        let head = TxResponse::new(Status::Continue).message(0);
        TxEntry::head(head).write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;
        self.receiver.set_continue_sent();
    }

    /// Queue a response head and body for transmission.
    ///
    /// A `Content-Length` header is inserted by the encoder unless the
    /// response already carries explicit framing. For HEAD requests
    /// the body bytes are suppressed while the `Content-Length` header
    /// is preserved. When the request asked for the connection to be
    /// closed, a graceful disconnect follows the write.
    pub fn send_response(&mut self, response: TxResponse, body: Vec<u8>)
        -> Result<(), Error>
    {
        if self.flags.closed {
            return Err(Error::Closed);
        }
        if !response.is_valid() {
            error!("response {} refused: split headers", response.status());
            return Err(Error::SplitHeaders);
        }
        debug!("sending response {} ({} body bytes)",
               response.status(), body.len());
        let entry = response_entry(&response, body, self.receiver.is_head());
        entry.write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;

        if self.receiver.request().valid()
            && !self.receiver.request().keep_alive()
        {
            self.flags.disconnect_pending = true;
        }
        Ok(())
    }

    /// Queue one chunk of a chunked response body.
    ///
    /// Empty chunks are ignored: a zero-sized chunk would terminate
    /// the message.
    pub fn send_chunk(&mut self, data: Vec<u8>, extension: &str)
        -> Result<(), Error>
    {
        if self.flags.closed {
            return Err(Error::Closed);
        }
        if data.is_empty() {
            return Ok(());
        }
        let header = chunked::chunk_header(data.len() as u64, extension);
        TxEntry::chunk(header, data).write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;
        Ok(())
    }

    /// Queue the terminating chunk, with optional extension and
    /// trailers.
    pub fn send_last_chunk(&mut self, extension: &str,
        trailer_string: &str)
        -> Result<(), Error>
    {
        if self.flags.closed {
            return Err(Error::Closed);
        }
        let last = LastChunk::new(extension, trailer_string);
        TxEntry::head(last.to_string()).write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;
        Ok(())
    }

    /// Send the minimal canned response for the receiver's computed
    /// status code.
    pub fn send_canned_response(&mut self) {
        let status = self.receiver.response_code().clone();
        let mut response = TxResponse::new(status);
        #[cfg(feature="date_header")]
        response.add_date_header();
        response.add_server_header();
        let _ = self.send_response(response, Vec::new());
    }

    /// Request a graceful disconnect.
    ///
    /// Deferred until the transmit buffer drains; the `Disconnected`
    /// event follows.
    pub fn disconnect(&mut self) {
        if self.flags.request_disconnect() {
            self.flags.connected = false;
            self.flags.closed = true;
        }
    }

    /// Tell the receiver the event surfaced by `poll_event` has been
    /// handled, readying it for the next message.
    pub fn finish_event(&mut self, event: Event) {
        match event {
            Event::Request => {
                // a chunked request in progressive mode stays open:
                // its chunks are still to come
                if !self.receiver.request().is_chunked()
                    || self.config.concatenate_chunks
                {
                    self.receiver.clear();
                }
            }
            Event::Chunk => {
                if self.receiver.chunk().is_last() {
                    self.receiver.clear();
                }
            }
            Event::InvalidRequest => {
                self.receiver.clear();
            }
            Event::ExpectContinue | Event::Disconnected => {}
        }
    }

    /// Flush buffered output to the transport.
    ///
    /// Returns true when a queued message finished sending in this
    /// call. A deferred disconnect fires once the buffer is empty.
    pub fn poll_write(&mut self) -> Result<bool, Error>
        where S: AsyncWrite
    {
        if self.flags.closed {
            return Ok(false);
        }
        self.cout.flush()?;
        let mut sent = false;
        if self.flags.transmitting && self.cout.out_buf.len() == 0 {
            self.flags.transmitting = false;
            sent = true;
        }
        if self.flags.disconnect_pending && self.cout.out_buf.len() == 0 {
            trace!("write buffer drained, completing deferred disconnect");
            self.flags.disconnect_pending = false;
            self.flags.shutdown_sent = true;
            self.flags.connected = false;
            self.flags.closed = true;
        }
        Ok(sent)
    }

    /// Read from the transport and surface the next protocol event.
    ///
    /// After handling a `Request`, `Chunk` or `InvalidRequest` event
    /// the caller must invoke `finish_event` so the receiver is ready
    /// for the next message; `Proto` does this automatically.
    pub fn poll_event(&mut self) -> Poll<Event, Error>
        where S: AsyncRead
    {
        loop {
            if self.flags.closed {
                return Ok(Async::Ready(Event::Disconnected));
            }
            if self.cin.in_buf.len() > 0 {
                let mut pos = 0;
                let outcome = self.receiver
                    .receive(&self.cin.in_buf[..], &mut pos);
                self.cin.in_buf.consume(pos);
                match outcome {
                    Recv::Incomplete => {}
                    Recv::Valid => {
                        trace!("request received: {} {}",
                               self.receiver.request().method(),
                               self.receiver.request().uri());
                        return Ok(Async::Ready(Event::Request));
                    }
                    Recv::Chunk => {
                        return Ok(Async::Ready(Event::Chunk));
                    }
                    Recv::ExpectContinue => {
                        return Ok(Async::Ready(Event::ExpectContinue));
                    }
                    Recv::Invalid => {
                        error!("invalid request, status {}",
                               self.receiver.response_code().code());
                        return Ok(Async::Ready(Event::InvalidRequest));
                    }
                }
            }
            if self.cin.read()? == 0 {
                if self.cin.done() {
                    // peer shutdown: answer with ours if still owed
                    if !self.flags.shutdown_sent {
                        self.flags.shutdown_sent = true;
                    }
                    self.flags.connected = false;
                    self.flags.closed = true;
                    return Ok(Async::Ready(Event::Disconnected));
                } else {
                    return Ok(Async::NotReady);
                }
            }
        }
    }
}

/// Serialize a response head and body into a transmit entry.
///
/// The response to a HEAD request omits the body bytes while keeping
/// the `Content-Length` header that describes them.
fn response_entry(response: &TxResponse, body: Vec<u8>, is_head: bool)
    -> TxEntry
{
    let head = response.message(body.len() as u64);
    if is_head {
        TxEntry::head(head)
    } else {
        TxEntry::with_body(head, body)
    }
}
