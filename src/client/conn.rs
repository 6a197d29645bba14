//! The per-connection client protocol state machine.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::{Async, Poll};
use tk_bufstream::{IoBuf, ReadBuf, WriteBuf};
use tokio_io::{AsyncRead, AsyncWrite};
use url::Url;

use chunked::{self, LastChunk, RxChunk};
use connection::{ConnState, Flags, TxEntry};
use error::Error;
use header_field::Id;
use headers::Recv;
use request::TxRequest;
use response::{ResponseReceiver, RxResponse};
use client::Config;

/// Protocol events surfaced by `HttpConnection::poll_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// a response was received
    Response,
    /// a chunk of a chunked response was received (progressive mode)
    Chunk,
    /// a malformed response was received
    InvalidResponse,
    /// the connection is gone
    Disconnected,
}

/// The `Host` header value for a url: the host name, with the port
/// appended only when it is not the default for the scheme.
pub fn http_host_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("").to_string();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}

/// A low-level HTTP/1.x client connection over a byte transport.
pub struct HttpConnection<S> {
    cin: ReadBuf<S>,
    cout: WriteBuf<S>,
    receiver: ResponseReceiver,
    config: Arc<Config>,
    host_header: String,
    /// is_head flags of the requests awaiting their responses
    outstanding: VecDeque<bool>,
    flags: Flags,
}

impl<S: AsyncRead + AsyncWrite> HttpConnection<S> {
    /// Wrap a connected transport into a client connection for the
    /// given url's host.
    pub fn new(sock: S, cfg: &Arc<Config>, url: &Url) -> HttpConnection<S> {
        HttpConnection::for_host(sock, cfg, &http_host_name(url))
    }

    /// Wrap a connected transport, with an explicit `Host` header
    /// value.
    pub fn for_host(sock: S, cfg: &Arc<Config>, host: &str)
        -> HttpConnection<S>
    {
        let (cout, cin) = IoBuf::new(sock).split();
        let mut receiver = ResponseReceiver::new(cfg.limits);
        receiver.set_concatenate_chunks(cfg.concatenate_chunks);
        let mut flags = Flags::new();
        flags.connected = true;
        HttpConnection {
            cin: cin,
            cout: cout,
            receiver: receiver,
            config: cfg.clone(),
            host_header: host.to_string(),
            outstanding: VecDeque::new(),
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

    /// The response currently held by the receiver.
    pub fn response(&self) -> &RxResponse {
        self.receiver.response()
    }

    /// The body of the response currently held by the receiver.
    pub fn body(&self) -> &[u8] {
        self.receiver.body()
    }

    /// The chunk currently held by the receiver.
    pub fn chunk(&self) -> &RxChunk {
        self.receiver.chunk()
    }

    /// Queue a request head and body for transmission.
    ///
    /// The mandatory `Host` header is appended here, so requests built
    /// by the application never need to carry one.
    pub fn send_request(&mut self, request: TxRequest, body: Vec<u8>)
        -> Result<(), Error>
    {
        if self.flags.closed {
            return Err(Error::Closed);
        }
        if !request.is_valid() {
            error!("request {} {} refused: split headers",
                   request.method(), request.uri());
            return Err(Error::SplitHeaders);
        }
        let mut request = request;
        request.add_header_field(Id::Host, &self.host_header);
        debug!("sending request {} {}", request.method(), request.uri());
        let is_head = request.method() == "HEAD";
        let head = request.message(body.len() as u64);
        TxEntry::with_body(head, body).write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;
        self.outstanding.push_back(is_head);
        Ok(())
    }

    /// Queue raw body bytes, e.g. after a `100 Continue`.
    pub fn send_body(&mut self, body: Vec<u8>) -> Result<(), Error> {
        if self.flags.closed {
            return Err(Error::Closed);
        }
        TxEntry::with_body(String::new(), body)
            .write_to(&mut self.cout.out_buf);
        self.flags.transmitting = true;
        Ok(())
    }

    /// Queue one chunk of a chunked request body.
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

    /// Request a graceful disconnect.
    pub fn disconnect(&mut self) {
        if self.flags.request_disconnect() {
            self.flags.connected = false;
            self.flags.closed = true;
        }
    }

    /// Tell the receiver the event surfaced by `poll_event` has been
    /// handled, readying it for the next response.
    pub fn finish_event(&mut self, event: Event) {
        match event {
            Event::Response => {
                let code = self.receiver.response().status();
                let head_front =
                    self.outstanding.front().cloned().unwrap_or(false);
                let no_body = head_front
                    || (code >= 100 && code < 200)
                    || code == 204 || code == 304;
                let streaming = self.receiver.response().is_chunked()
                    && !no_body && !self.config.concatenate_chunks;
                if !streaming {
                    // an interim 100 leaves its request outstanding
                    if code != 100 {
                        self.outstanding.pop_front();
                    }
                    self.receiver.clear();
                }
            }
            Event::Chunk => {
                if self.receiver.chunk().is_last() {
                    self.outstanding.pop_front();
                    self.receiver.clear();
                }
            }
            Event::InvalidResponse => {
                self.outstanding.pop_front();
                self.receiver.clear();
            }
            Event::Disconnected => {}
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
    /// After handling a `Response`, `Chunk` or `InvalidResponse`
    /// event the caller must invoke `finish_event`; `Proto` does this
    /// automatically.
    pub fn poll_event(&mut self) -> Poll<Event, Error>
        where S: AsyncRead
    {
        loop {
            if self.flags.closed {
                return Ok(Async::Ready(Event::Disconnected));
            }
            if self.cin.in_buf.len() > 0 {
                if self.outstanding.is_empty()
                    && !self.receiver.response().valid()
                {
                    error!("bytes received with no outstanding request");
                    return Err(Error::PrematureResponse);
                }
                // the receiver frames the reply to a HEAD request as
                // body-less whatever its headers declare
                let head_front =
                    self.outstanding.front().cloned().unwrap_or(false);
                self.receiver.set_head_request(head_front);
                let mut pos = 0;
                let outcome = self.receiver
                    .receive(&self.cin.in_buf[..], &mut pos);
                self.cin.in_buf.consume(pos);
                match outcome {
                    Recv::Incomplete => {}
                    Recv::Valid => {
                        trace!("response received: {}",
                               self.receiver.response().status());
                        return Ok(Async::Ready(Event::Response));
                    }
                    Recv::Chunk => {
                        return Ok(Async::Ready(Event::Chunk));
                    }
                    Recv::Invalid => {
                        error!("invalid response received");
                        return Ok(Async::Ready(Event::InvalidResponse));
                    }
                    Recv::ExpectContinue => unreachable!(),
                }
            }
            if self.cin.read()? == 0 {
                if self.cin.done() {
                    // peer shutdown: answer with ours if still owed,
                    // and complete a close-framed body
                    let eof = self.receiver.receive_eof();
                    if !self.flags.shutdown_sent {
                        self.flags.shutdown_sent = true;
                    }
                    self.flags.connected = false;
                    self.flags.closed = true;
                    if eof == Recv::Valid {
                        return Ok(Async::Ready(Event::Response));
                    }
                    if self.receiver.response().valid()
                        && !self.receiver.read_until_close()
                    {
                        error!("peer closed inside a message body");
                        return Err(Error::ResetOnMessageBody);
                    }
                    return Ok(Async::Ready(Event::Disconnected));
                } else {
                    return Ok(Async::NotReady);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use tk_bufstream::MockData;
    use url::Url;

    use client::Config;
    use request::TxRequest;
    use super::{http_host_name, HttpConnection};

    #[test]
    fn host_names() {
        let url = Url::parse("http://example.com/foo").unwrap();
        assert_eq!(http_host_name(&url), "example.com");
        // the default port is elided
        let url = Url::parse("http://example.com:80/foo").unwrap();
        assert_eq!(http_host_name(&url), "example.com");
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(http_host_name(&url), "example.com");
        let url = Url::parse("http://example.com:8080/foo").unwrap();
        assert_eq!(http_host_name(&url), "example.com:8080");
    }

    #[test]
    fn request_bytes_on_the_wire() {
        let mock = MockData::new();
        let mut conn = HttpConnection::for_host(
            mock.clone(), &Config::new().done(), "example.com");
        conn.send_request(TxRequest::new("GET", "/hello"), Vec::new())
            .unwrap();
        assert!(conn.poll_write().unwrap());
        assert_eq!(&mock.output(..)[..],
                   &b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\
                      Content-Length: 0\r\n\r\n"[..]);
    }

    #[test]
    fn chunked_request_body_on_the_wire() {
        let mock = MockData::new();
        let mut conn = HttpConnection::for_host(
            mock.clone(), &Config::new().done(), "x");
        let mut request = TxRequest::new("POST", "/upload");
        request.add_header_field(::header_field::Id::TransferEncoding,
                                 "Chunked");
        conn.send_request(request, Vec::new()).unwrap();
        conn.send_chunk(b"abc".to_vec(), "").unwrap();
        conn.send_last_chunk("", "").unwrap();
        conn.poll_write().unwrap();
        assert_eq!(&mock.output(..)[..],
                   &b"POST /upload HTTP/1.1\r\n\
                      Transfer-Encoding: Chunked\r\nHost: x\r\n\r\n\
                      3\r\nabc\r\n0\r\n\r\n"[..]);
    }
}
