//! Parsing and encoding of HTTP requests.
//!
//! `RequestLine` is the byte-at-a-time start line parser, `RxRequest`
//! combines it with a header block, and `RequestReceiver` drives both
//! plus body framing across network packet boundaries, yielding one
//! `Recv` outcome per call.

use std::cmp::min;

use character::{http_version, is_blank, is_end_of_line, CRLF};
use chunked::RxChunk;
use enums::Status;
use header_field::{self, Id};
use headers::{MessageHeaders, Recv};
use limits::Limits;

/// Parsing state of a request start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// request method
    Method,
    /// request uri
    Uri,
    /// HTTP/ H
    HttpH,
    /// HTTP/ first T
    HttpT1,
    /// HTTP/ second T
    HttpT2,
    /// HTTP/ P
    HttpP,
    /// HTTP/ slash
    HttpSlash,
    /// HTTP major version number
    HttpMajor,
    /// HTTP . between major and minor versions
    HttpDot,
    /// HTTP minor version number
    HttpMinor,
    /// the carriage return (if any)
    Cr,
    /// the line feed
    Lf,
    /// the request line is valid
    Valid,
    /// `strict_crlf` is set and LF was received without CR
    ErrorCrlf,
    /// the whitespace run is longer than `max_whitespace_chars`
    ErrorWs,
    /// the method is longer than `max_method_length`
    ErrorMethodLength,
    /// the uri is longer than `max_uri_length`
    ErrorUriLength,
}

/// A streaming parser for the HTTP request start line:
/// `METHOD SP URI SP HTTP/M.N CRLF`.
#[derive(Debug, Clone)]
pub struct RequestLine {
    limits: Limits,
    method: String,
    uri: String,
    major_version: u8,
    minor_version: u8,
    state: RequestState,
    ws_count: usize,
    valid: bool,
    fail: bool,
}

impl RequestLine {
    pub fn new(limits: Limits) -> RequestLine {
        RequestLine {
            limits: limits,
            method: String::new(),
            uri: String::new(),
            major_version: 0,
            minor_version: 0,
            state: RequestState::Method,
            ws_count: 0,
            valid: false,
            fail: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.method.clear();
        self.uri.clear();
        self.major_version = 0;
        self.minor_version = 0;
        self.state = RequestState::Method;
        self.ws_count = 0;
        self.valid = false;
        self.fail = false;
    }

    fn parse_byte(&mut self, c: u8) -> bool {
        use self::RequestState::*;
        match self.state {
            Method => {
                // Valid HTTP methods must be uppercase chars
                if c.is_ascii_uppercase() {
                    self.method.push(c as char);
                    if self.method.len() > self.limits.max_method_length {
                        self.state = ErrorMethodLength;
                        return false;
                    }
                } else if is_blank(c) && !self.method.is_empty() {
                    self.ws_count = 1;
                    self.state = Uri;
                } else {
                    return false;
                }
            }
            Uri => {
                if is_end_of_line(c) {
                    return false;
                } else if is_blank(c) {
                    self.ws_count += 1;
                    if self.ws_count > self.limits.max_whitespace_chars {
                        self.state = ErrorWs;
                        return false;
                    }
                    if !self.uri.is_empty() {
                        self.ws_count = 1;
                        self.state = HttpH;
                    }
                } else {
                    self.uri.push(c as char);
                    if self.uri.len() > self.limits.max_uri_length {
                        self.state = ErrorUriLength;
                        return false;
                    }
                }
            }
            HttpH => {
                // Ignore leading whitespace, up to a limit
                if is_blank(c) {
                    self.ws_count += 1;
                    if self.ws_count > self.limits.max_whitespace_chars {
                        self.state = ErrorWs;
                        return false;
                    }
                } else if c == b'H' {
                    self.state = HttpT1;
                } else {
                    return false;
                }
            }
            HttpT1 => {
                if c == b'T' {
                    self.state = HttpT2;
                } else {
                    return false;
                }
            }
            HttpT2 => {
                if c == b'T' {
                    self.state = HttpP;
                } else {
                    return false;
                }
            }
            HttpP => {
                if c == b'P' {
                    self.state = HttpSlash;
                } else {
                    return false;
                }
            }
            HttpSlash => {
                if c == b'/' {
                    self.state = HttpMajor;
                } else {
                    return false;
                }
            }
            HttpMajor => {
                if c.is_ascii_digit() {
                    self.major_version = c;
                    self.state = HttpDot;
                } else {
                    return false;
                }
            }
            HttpDot => {
                if c == b'.' {
                    self.state = HttpMinor;
                } else {
                    return false;
                }
            }
            HttpMinor => {
                if c.is_ascii_digit() {
                    self.minor_version = c;
                    self.state = Cr;
                } else {
                    return false;
                }
            }
            Cr => {
                // The line should end with CRLF, but a bare LF is
                // permitted when not strict
                if c == b'\r' {
                    self.state = Lf;
                } else if !self.limits.strict_crlf && c == b'\n' {
                    self.state = Valid;
                } else {
                    self.state = ErrorCrlf;
                    return false;
                }
            }
            Lf => {
                if c == b'\n' {
                    self.state = Valid;
                } else {
                    return false;
                }
            }
            _ => return false,
        }
        true
    }

    /// Parse the line as an HTTP request.
    ///
    /// Consumes bytes from `buf` starting at `*pos`. A false return
    /// with bytes left (or `fail()`) is a parse error, otherwise the
    /// line is incomplete.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        while *pos < buf.len() && self.state != RequestState::Valid {
            let c = buf[*pos];
            *pos += 1;
            if !self.parse_byte(c) {
                self.fail = true;
                return false;
            }
        }
        self.valid = self.state == RequestState::Valid;
        self.valid
    }

    /// The request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request uri.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The HTTP major version digit character.
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// The HTTP minor version digit character.
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn fail(&self) -> bool {
        self.fail
    }

    /// True for HTTP/1.0 or earlier.
    pub fn is_http_1_0_or_earlier(&self) -> bool {
        self.major_version == b'0' ||
            (self.major_version == b'1' && self.minor_version == b'0')
    }

    /// Replace the request method, used by HEAD translation.
    pub fn set_method(&mut self, method: &str) {
        self.method.clear();
        self.method.push_str(method);
    }

    /// The request line as a string.
    pub fn to_string(&self) -> String {
        let mut output = String::with_capacity(
            self.method.len() + self.uri.len() + 12);
        output.push_str(&self.method);
        output.push(' ');
        output.push_str(&self.uri);
        output.push(' ');
        output.push_str(&http_version(self.major_version,
                                      self.minor_version));
        output.push_str(CRLF);
        output
    }
}

/// A received HTTP request: start line plus header block.
#[derive(Debug, Clone)]
pub struct RxRequest {
    line: RequestLine,
    headers: MessageHeaders,
    valid: bool,
}

impl RxRequest {
    pub fn new(limits: Limits) -> RxRequest {
        RxRequest {
            line: RequestLine::new(limits),
            headers: MessageHeaders::new(limits),
            valid: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.line.clear();
        self.headers.clear();
        self.valid = false;
    }

    /// Parse an HTTP request.
    ///
    /// On a valid return `*pos` refers to the start of the body, the
    /// first chunk, the next pipelined request, or the end of the
    /// buffer.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        if !self.line.valid() && !self.line.parse(buf, pos) {
            return false;
        }
        if !self.headers.valid() && !self.headers.parse(buf, pos) {
            return false;
        }
        self.valid = true;
        true
    }

    pub fn method(&self) -> &str {
        self.line.method()
    }

    pub fn uri(&self) -> &str {
        self.line.uri()
    }

    pub fn major_version(&self) -> u8 {
        self.line.major_version()
    }

    pub fn minor_version(&self) -> u8 {
        self.line.minor_version()
    }

    /// The request message headers.
    pub fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    /// The value of the content length header, 0 if absent, -1 if
    /// invalid.
    pub fn content_length(&self) -> i64 {
        self.headers.content_length()
    }

    /// Whether chunked transfer encoding is applied.
    pub fn is_chunked(&self) -> bool {
        self.headers.is_chunked()
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// The start line parser state, for error classification.
    pub fn line_state(&self) -> RequestState {
        self.line.state()
    }

    /// True if either the line or the header block hit a terminal
    /// parse error.
    pub fn fail(&self) -> bool {
        self.line.fail() || self.headers.fail()
    }

    pub fn is_http_1_0_or_earlier(&self) -> bool {
        self.line.is_http_1_0_or_earlier()
    }

    /// Whether the connection should be kept alive: the request is
    /// HTTP/1.1 and has no `Connection: close`.
    pub fn keep_alive(&self) -> bool {
        !self.line.is_http_1_0_or_earlier() &&
            !self.headers.close_connection()
    }

    /// Whether an HTTP/1.1 request is missing its `Host` header.
    pub fn missing_host_header(&self) -> bool {
        self.line.major_version() == b'1' &&
            self.line.minor_version() == b'1' &&
            self.headers.find_id(Id::Host).is_none()
    }

    /// Whether the client expects a `100 Continue` response.
    pub fn expect_continue(&self) -> bool {
        !self.line.is_http_1_0_or_earlier() &&
            self.headers.expect_continue()
    }

    /// Whether the request method is HEAD.
    pub fn is_head(&self) -> bool {
        self.line.method() == "HEAD"
    }

    /// Whether the request method is TRACE.
    pub fn is_trace(&self) -> bool {
        self.line.method() == "TRACE"
    }

    /// Replace the request method, used by HEAD translation.
    pub fn set_method(&mut self, method: &str) {
        self.line.set_method(method)
    }

    /// The request line as a string.
    pub fn to_string(&self) -> String {
        self.line.to_string()
    }
}

/// An outgoing HTTP request under construction.
///
/// A one-shot value object: accumulate headers, then emit the whole
/// message head with `message()`.
#[derive(Debug, Clone)]
pub struct TxRequest {
    method: String,
    uri: String,
    major_version: u8,
    minor_version: u8,
    header_string: String,
}

impl TxRequest {
    /// Create a request with the given method and uri, HTTP/1.1.
    pub fn new<M: AsRef<str>>(method: M, uri: &str) -> TxRequest {
        TxRequest {
            method: method.as_ref().to_string(),
            uri: uri.to_string(),
            major_version: b'1',
            minor_version: b'1',
            header_string: String::new(),
        }
    }

    /// Set the HTTP version digits, e.g. `b'1', b'0'`.
    pub fn set_version(&mut self, major_version: u8, minor_version: u8) {
        self.major_version = major_version;
        self.minor_version = minor_version;
    }

    /// The request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request uri.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Replace the accumulated header string.
    ///
    /// Overwrites any headers added so far, so call it before the
    /// `add_header` functions.
    pub fn set_header_string(&mut self, header_string: &str) {
        self.header_string.clear();
        self.header_string.push_str(header_string);
    }

    /// Add a standard header to the request.
    pub fn add_header_field(&mut self, field_id: Id, value: &str) {
        self.header_string
            .push_str(&header_field::to_header(field_id.name(), value));
    }

    /// Add a free form header to the request.
    pub fn add_header(&mut self, field: &str, value: &str) {
        self.header_string
            .push_str(&header_field::to_header(field, value));
    }

    /// Add a content length header line for the given size.
    pub fn add_content_length_header(&mut self, size: u64) {
        self.header_string.push_str(&header_field::content_length(size));
    }

    /// Whether the accumulated headers are free of split-header
    /// injection.
    pub fn is_valid(&self) -> bool {
        !::headers::are_headers_split(&self.header_string)
    }

    /// The request line as a string.
    pub fn start_line(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.method);
        output.push(' ');
        output.push_str(&self.uri);
        output.push(' ');
        output.push_str(&http_version(self.major_version,
                                      self.minor_version));
        output.push_str(CRLF);
        output
    }

    /// The complete message head.
    ///
    /// A `Content-Length` header for `content_length` is inserted
    /// unless the accumulated headers already carry a content length
    /// or a transfer encoding.
    pub fn message(&self, content_length: u64) -> String {
        let mut output = self.start_line();
        output.push_str(&self.header_string);

        let no_content_length =
            !self.header_string.contains(Id::ContentLength.name());
        let no_transfer_encoding =
            !self.header_string.contains(Id::TransferEncoding.name());
        if no_content_length && no_transfer_encoding {
            output.push_str(&header_field::content_length(content_length));
        }
        output.push_str(CRLF);
        output
    }
}

/// A receiver for HTTP requests and any associated body or chunks.
///
/// Owns the request parser, the chunk parser and the body buffer for
/// one connection; `clear()` readies it for the next pipelined
/// request.
#[derive(Debug, Clone)]
pub struct RequestReceiver {
    limits: Limits,
    translate_head: bool,
    concatenate_chunks: bool,
    trace_enabled: bool,
    request: RxRequest,
    chunk: RxChunk,
    body: Vec<u8>,
    /// the appropriate response to the request: an error status or
    /// 100 Continue
    response_code: Status,
    continue_sent: bool,
    is_head: bool,
}

impl RequestReceiver {
    pub fn new(limits: Limits) -> RequestReceiver {
        RequestReceiver {
            limits: limits,
            translate_head: true,
            concatenate_chunks: true,
            trace_enabled: false,
            request: RxRequest::new(limits),
            chunk: RxChunk::new(limits),
            body: Vec::new(),
            response_code: Status::NoContent,
            continue_sent: false,
            is_head: false,
        }
    }

    /// Enable translating HEAD requests into GET requests for the
    /// application.
    pub fn set_translate_head(&mut self, enable: bool) {
        self.translate_head = enable;
    }

    /// Enable concatenating chunked bodies into a single buffer.
    pub fn set_concatenate_chunks(&mut self, enable: bool) {
        self.concatenate_chunks = enable;
    }

    /// Permit body-less TRACE requests instead of rejecting them
    /// with 405.
    pub fn set_trace_enabled(&mut self, enable: bool) {
        self.trace_enabled = enable;
    }

    /// Record that a `100 Continue` has been sent, so it is not sent
    /// twice.
    pub fn set_continue_sent(&mut self) {
        self.continue_sent = true;
    }

    /// Reset for the next message, keeping the configured bounds.
    ///
    /// The response code is required to build the response to a failed
    /// message, so it is deliberately not reset.
    pub fn clear(&mut self) {
        self.request.clear();
        self.chunk.clear();
        self.body.clear();
        self.continue_sent = false;
        self.is_head = false;
    }

    /// Whether the request was originally a HEAD request.
    pub fn is_head(&self) -> bool {
        self.is_head
    }

    /// The received request.
    pub fn request(&self) -> &RxRequest {
        &self.request
    }

    /// The most recently received chunk.
    pub fn chunk(&self) -> &RxChunk {
        &self.chunk
    }

    /// The request body, or the concatenated chunk data.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The status for the response: an error status after an invalid
    /// outcome, `Continue` after an expect-continue outcome.
    pub fn response_code(&self) -> &Status {
        &self.response_code
    }

    /// The body of a TRACE echo response: the request line followed by
    /// the re-emitted headers.
    pub fn trace_body(&self) -> Vec<u8> {
        let mut output = self.request.to_string();
        output.push_str(&self.request.headers().to_string());
        output.into_bytes()
    }

    /// Receive data for an HTTP request, its body or a chunk.
    ///
    /// Consumes bytes from `buf` starting at `*pos`; on a `Valid`
    /// outcome any bytes left belong to the next pipelined request.
    pub fn receive(&mut self, buf: &[u8], pos: &mut usize) -> Recv {
        // building a request
        let request_parsed = !self.request.valid();
        if request_parsed {
            if !self.request.parse(buf, pos) {
                // a parsing error rather than running out of data
                if *pos < buf.len() || self.request.fail() {
                    self.response_code = match self.request.line_state() {
                        RequestState::ErrorMethodLength =>
                            Status::NotImplemented,
                        RequestState::ErrorUriLength =>
                            Status::RequestURITooLong,
                        _ => Status::BadRequest,
                    };
                    self.clear();
                    return Recv::Invalid;
                } else {
                    return Recv::Incomplete;
                }
            }
        }

        // ensure that an HTTP/1.1 request has a host header
        if self.request.missing_host_header() {
            self.response_code = Status::BadRequest;
            return Recv::Invalid;
        }

        if !self.request.is_chunked() {
            self.receive_body(buf, pos)
        } else {
            self.receive_chunk(buf, pos, request_parsed)
        }
    }

    fn receive_body(&mut self, buf: &[u8], pos: &mut usize) -> Recv {
        let rx_size = buf.len() - *pos;
        let content_length = self.request.content_length();

        // TRACE requests may not be allowed
        if self.request.is_trace() {
            if content_length != 0 {
                // TRACE requests are not permitted with a body
                self.response_code = Status::BadRequest;
                self.clear();
                return Recv::Invalid;
            } else if !self.trace_enabled {
                self.response_code = Status::MethodNotAllowed;
                self.clear();
                return Recv::Invalid;
            }
        }

        // test whether the content length header is valid
        if content_length < 0 {
            self.response_code = Status::BadRequest;
            self.clear();
            return Recv::Invalid;
        }
        if content_length > 0 {
            if content_length as u64 > self.limits.max_content_length {
                self.response_code = Status::PayloadTooLarge;
                self.clear();
                return Recv::Invalid;
            }
        } else if rx_size > 0
            && self.request.headers().find_id(Id::ContentLength).is_none()
        {
            // a body without a content length header
            self.response_code = Status::LengthRequired;
            self.clear();
            return Recv::Invalid;
        }

        // copy up to the required number of body bytes
        let required = content_length as usize - self.body.len();
        let take = min(required, rx_size);
        self.body.extend_from_slice(&buf[*pos..*pos + take]);
        *pos += take;

        if self.body.len() as i64 == content_length {
            self.finish_message();
            return Recv::Valid;
        }
        Recv::Incomplete
    }

    fn receive_chunk(&mut self, buf: &[u8], pos: &mut usize,
        request_parsed: bool)
        -> Recv
    {
        // A chunk parsed previously is cleared, ready for the next one
        if self.chunk.valid() {
            self.chunk.clear();
        }

        // If the request header has just been parsed, respond first if
        // necessary
        if request_parsed {
            if self.request.expect_continue() && !self.continue_sent {
                self.response_code = Status::Continue;
                return Recv::ExpectContinue;
            } else if !self.concatenate_chunks {
                self.finish_message();
                return Recv::Valid;
            }
        }

        if !self.chunk.parse(buf, pos) {
            // a parsing error rather than running out of data
            if *pos < buf.len() || self.chunk.fail() {
                self.response_code = Status::BadRequest;
                self.clear();
                return Recv::Invalid;
            }
        }

        // a complete chunk has been parsed
        if self.chunk.valid() {
            if !self.concatenate_chunks {
                return Recv::Chunk;
            }
            if self.chunk.is_last() {
                self.finish_message();
                return Recv::Valid;
            }
            // the concatenated chunks must stay within the body cap
            if (self.body.len() + self.chunk.data().len()) as u64
                > self.limits.max_content_length
            {
                self.response_code = Status::PayloadTooLarge;
                self.clear();
                return Recv::Invalid;
            }
            self.body.extend_from_slice(self.chunk.data());
        }

        Recv::Incomplete
    }

    fn finish_message(&mut self) {
        self.is_head = self.request.is_head();
        // If enabled, translate a HEAD request to a GET request
        if self.is_head && self.translate_head {
            self.request.set_method("GET");
        }
    }
}
