//! Parsing and encoding of HTTP responses.
//!
//! Mirrors the request side: `ResponseLine` is the incremental start
//! line parser, `RxResponse` adds the header block, and
//! `ResponseReceiver` frames the body. The extra wrinkle on this side
//! is the legacy framing fallback where the server just closes the
//! connection when the body is done.

use std::cmp::min;

use character::{http_version, is_blank, is_end_of_line, CRLF};
use chunked::RxChunk;
use enums::Status;
use header_field::{self, Id};
use headers::{MessageHeaders, Recv};
use limits::Limits;

/// Parsing state of a response start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
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
    /// the mandatory whitespace before the status
    HttpWs,
    /// response status code
    Status,
    /// response reason phrase
    Reason,
    /// the carriage return (if any)
    Cr,
    /// the line feed
    Lf,
    /// the response line is valid
    Valid,
    /// `strict_crlf` is set and LF was received without CR
    ErrorCrlf,
    /// the whitespace run is longer than `max_whitespace_chars`
    ErrorWs,
    /// the status is greater than `max_status_number`
    ErrorStatusValue,
    /// the reason phrase is longer than `max_reason_length`
    ErrorReasonLength,
}

/// A streaming parser for the HTTP response start line:
/// `HTTP/M.N SP STATUS SP REASON CRLF`.
#[derive(Debug, Clone)]
pub struct ResponseLine {
    limits: Limits,
    status: u16,
    reason_phrase: String,
    major_version: u8,
    minor_version: u8,
    state: ResponseState,
    ws_count: usize,
    status_read: bool,
    valid: bool,
    fail: bool,
}

impl ResponseLine {
    pub fn new(limits: Limits) -> ResponseLine {
        ResponseLine {
            limits: limits,
            status: 0,
            reason_phrase: String::new(),
            major_version: 0,
            minor_version: 0,
            state: ResponseState::HttpH,
            ws_count: 0,
            status_read: false,
            valid: false,
            fail: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.status = 0;
        self.reason_phrase.clear();
        self.major_version = 0;
        self.minor_version = 0;
        self.state = ResponseState::HttpH;
        self.ws_count = 0;
        self.status_read = false;
        self.valid = false;
        self.fail = false;
    }

    fn parse_eol_byte(&mut self, c: u8) -> bool {
        use self::ResponseState::*;
        if c == b'\r' {
            self.state = Lf;
        } else if !self.limits.strict_crlf && c == b'\n' {
            self.state = Valid;
        } else {
            self.state = ErrorCrlf;
            return false;
        }
        true
    }

    fn parse_byte(&mut self, c: u8) -> bool {
        use self::ResponseState::*;
        match self.state {
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
                    // at least one whitespace char before the status
                    self.state = HttpWs;
                } else {
                    return false;
                }
            }
            HttpWs => {
                if is_blank(c) {
                    self.ws_count = 1;
                    self.state = Status;
                } else {
                    return false;
                }
            }
            Status => {
                if c.is_ascii_digit() {
                    self.status_read = true;
                    let value = self.status as u32 * 10
                        + (c - b'0') as u32;
                    if value > self.limits.max_status_number as u32 {
                        self.state = ErrorStatusValue;
                        return false;
                    }
                    self.status = value as u16;
                } else if is_blank(c) {
                    if self.status_read {
                        self.ws_count = 1;
                        self.state = Reason;
                    } else {
                        self.ws_count += 1;
                        if self.ws_count > self.limits.max_whitespace_chars {
                            self.state = ErrorWs;
                            return false;
                        }
                    }
                } else {
                    return false;
                }
            }
            Reason => {
                if !is_end_of_line(c) {
                    // Ignore leading whitespace, up to a limit
                    if self.reason_phrase.is_empty() && is_blank(c) {
                        self.ws_count += 1;
                        if self.ws_count > self.limits.max_whitespace_chars {
                            self.state = ErrorWs;
                            return false;
                        }
                    } else {
                        self.reason_phrase.push(c as char);
                        if self.reason_phrase.len()
                            > self.limits.max_reason_length
                        {
                            self.state = ErrorReasonLength;
                            return false;
                        }
                    }
                } else {
                    return self.parse_eol_byte(c);
                }
            }
            Cr => {
                return self.parse_eol_byte(c);
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

    /// Parse the line as an HTTP response.
    ///
    /// Same cursor contract as `RequestLine::parse`.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        while *pos < buf.len() && self.state != ResponseState::Valid {
            let c = buf[*pos];
            *pos += 1;
            if !self.parse_byte(c) {
                self.fail = true;
                return false;
            }
        }
        self.valid = self.state == ResponseState::Valid;
        self.valid
    }

    /// The response status number.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether this is a 100 Continue response.
    pub fn is_continue(&self) -> bool {
        self.status == 100
    }

    /// The response reason phrase.
    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    /// The HTTP major version digit character.
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// The HTTP minor version digit character.
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    pub fn state(&self) -> ResponseState {
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
        self.major_version <= b'0' ||
            (self.major_version == b'1' && self.minor_version == b'0')
    }
}

/// A received HTTP response: start line plus header block.
#[derive(Debug, Clone)]
pub struct RxResponse {
    line: ResponseLine,
    headers: MessageHeaders,
    valid: bool,
}

impl RxResponse {
    pub fn new(limits: Limits) -> RxResponse {
        RxResponse {
            line: ResponseLine::new(limits),
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

    /// Parse an HTTP response.
    ///
    /// On a valid return `*pos` refers to the start of the body, the
    /// first chunk, the next response, or the end of the buffer.
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

    pub fn status(&self) -> u16 {
        self.line.status()
    }

    pub fn is_continue(&self) -> bool {
        self.line.is_continue()
    }

    pub fn reason_phrase(&self) -> &str {
        self.line.reason_phrase()
    }

    pub fn major_version(&self) -> u8 {
        self.line.major_version()
    }

    pub fn minor_version(&self) -> u8 {
        self.line.minor_version()
    }

    /// The response message headers.
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

    /// True if either the line or the header block hit a terminal
    /// parse error.
    pub fn fail(&self) -> bool {
        self.line.fail() || self.headers.fail()
    }

    pub fn is_http_1_0_or_earlier(&self) -> bool {
        self.line.is_http_1_0_or_earlier()
    }

    /// Whether the connection should be kept alive: the response is
    /// HTTP/1.1 and has no `Connection: close`.
    pub fn keep_alive(&self) -> bool {
        !self.line.is_http_1_0_or_earlier() &&
            !self.headers.close_connection()
    }
}

/// An outgoing HTTP response under construction.
///
/// A one-shot value object: set the status, accumulate headers, then
/// emit the whole message head with `message()`.
#[derive(Debug, Clone)]
pub struct TxResponse {
    status: u16,
    reason_phrase: String,
    major_version: u8,
    minor_version: u8,
    header_string: String,
}

impl TxResponse {
    /// Create a response for a standard status code.
    pub fn new(status: Status) -> TxResponse {
        TxResponse {
            status: status.code(),
            reason_phrase: status.reason().to_string(),
            major_version: b'1',
            minor_version: b'1',
            header_string: String::new(),
        }
    }

    /// Create a response with an arbitrary status and reason.
    ///
    /// A blank reason is replaced with the canonical phrase when the
    /// status is a standard one.
    pub fn with_status_and_reason(status: u16, reason_phrase: &str)
        -> TxResponse
    {
        let reason = if reason_phrase.is_empty() {
            match Status::from_code(status) {
                Some(standard) => standard.reason().to_string(),
                None => String::new(),
            }
        } else {
            reason_phrase.to_string()
        };
        TxResponse {
            status: status,
            reason_phrase: reason,
            major_version: b'1',
            minor_version: b'1',
            header_string: String::new(),
        }
    }

    /// Set the response status, replacing the reason phrase with the
    /// canonical one.
    pub fn set_status(&mut self, status: Status) {
        self.status = status.code();
        self.reason_phrase.clear();
        self.reason_phrase.push_str(status.reason());
    }

    /// Set the response status and reason phrase.
    pub fn set_status_and_reason(&mut self, status: u16,
        reason_phrase: &str)
    {
        self.status = status;
        self.reason_phrase.clear();
        self.reason_phrase.push_str(reason_phrase);
    }

    /// Set the HTTP version digits, e.g. `b'1', b'0'`.
    pub fn set_version(&mut self, major_version: u8, minor_version: u8) {
        self.major_version = major_version;
        self.minor_version = minor_version;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    /// Replace the accumulated header string.
    ///
    /// Overwrites any headers added so far, so call it before the
    /// `add_header` functions. Returns false if the new header string
    /// carries a split-header injection.
    pub fn set_header_string(&mut self, header_string: &str) -> bool {
        self.header_string.clear();
        self.header_string.push_str(header_string);
        !::headers::are_headers_split(&self.header_string)
    }

    /// Add a standard header to the response.
    pub fn add_header_field(&mut self, field_id: Id, value: &str) {
        self.header_string
            .push_str(&header_field::to_header(field_id.name(), value));
    }

    /// Add a free form header to the response.
    pub fn add_header(&mut self, field: &str, value: &str) {
        self.header_string
            .push_str(&header_field::to_header(field, value));
    }

    /// Add a content length header line for the given size.
    pub fn add_content_length_header(&mut self, size: u64) {
        self.header_string.push_str(&header_field::content_length(size));
    }

    /// Add a `Date:` header with the current date.
    #[cfg(feature="date_header")]
    pub fn add_date_header(&mut self) {
        self.header_string.push_str(&header_field::date_header());
    }

    /// Add a `Server:` header.
    pub fn add_server_header(&mut self) {
        self.header_string.push_str(&header_field::server_header());
    }

    /// Add a `Content-Type: message/http` header, for TRACE responses.
    pub fn add_content_http_header(&mut self) {
        self.header_string.push_str(&header_field::content_http_header());
    }

    /// Whether the accumulated headers are free of split-header
    /// injection. A response failing this check must not be sent.
    pub fn is_valid(&self) -> bool {
        !::headers::are_headers_split(&self.header_string)
    }

    /// The response line as a string.
    pub fn start_line(&self) -> String {
        let mut output = http_version(self.major_version,
                                      self.minor_version);
        output.push(' ');
        output.push_str(&self.status.to_string());
        output.push(' ');
        output.push_str(&self.reason_phrase);
        output.push_str(CRLF);
        output
    }

    /// The complete message head.
    ///
    /// A `Content-Length` header for `content_length` is inserted
    /// unless the accumulated headers already carry a content length
    /// or a transfer encoding, or the status forbids a body.
    pub fn message(&self, content_length: u64) -> String {
        let mut output = self.start_line();
        output.push_str(&self.header_string);

        let no_content_length =
            !self.header_string.contains(Id::ContentLength.name());
        let no_transfer_encoding =
            !self.header_string.contains(Id::TransferEncoding.name());
        let content_permitted = self.status >= 200
            && self.status != 204 && self.status != 304;
        if no_content_length && no_transfer_encoding && content_permitted {
            output.push_str(&header_field::content_length(content_length));
        }
        output.push_str(CRLF);
        output
    }
}

/// A receiver for HTTP responses and any associated body or chunks.
#[derive(Debug, Clone)]
pub struct ResponseReceiver {
    limits: Limits,
    concatenate_chunks: bool,
    response: RxResponse,
    chunk: RxChunk,
    body: Vec<u8>,
    /// body framed by connection close rather than by a header
    read_until_close: bool,
    /// the outstanding request was HEAD, so this response has no body
    head_request: bool,
}

impl ResponseReceiver {
    pub fn new(limits: Limits) -> ResponseReceiver {
        ResponseReceiver {
            limits: limits,
            concatenate_chunks: true,
            response: RxResponse::new(limits),
            chunk: RxChunk::new(limits),
            body: Vec::new(),
            read_until_close: false,
            head_request: false,
        }
    }

    /// Enable concatenating chunked bodies into a single buffer.
    pub fn set_concatenate_chunks(&mut self, enable: bool) {
        self.concatenate_chunks = enable;
    }

    /// Mark the response being received as the answer to a HEAD
    /// request, which carries headers describing a body but never the
    /// body itself. Reset by `clear`.
    pub fn set_head_request(&mut self, enable: bool) {
        self.head_request = enable;
    }

    /// Reset for the next message, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.response.clear();
        self.chunk.clear();
        self.body.clear();
        self.read_until_close = false;
        self.head_request = false;
    }

    /// The received response.
    pub fn response(&self) -> &RxResponse {
        &self.response
    }

    /// The most recently received chunk.
    pub fn chunk(&self) -> &RxChunk {
        &self.chunk
    }

    /// The response body, or the concatenated chunk data.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether the body is framed by connection close.
    pub fn read_until_close(&self) -> bool {
        self.read_until_close
    }

    /// Receive data for an HTTP response, its body or a chunk.
    pub fn receive(&mut self, buf: &[u8], pos: &mut usize) -> Recv {
        // building a response
        let response_parsed = !self.response.valid();
        if response_parsed {
            if !self.response.parse(buf, pos) {
                // a parsing error rather than running out of data
                if *pos < buf.len() || self.response.fail() {
                    self.clear();
                    return Recv::Invalid;
                } else {
                    return Recv::Incomplete;
                }
            }
        }

        // responses to HEAD requests and 1xx/204/304 statuses carry
        // no body, whatever their framing headers declare
        let code = self.response.status();
        if self.head_request || (code >= 100 && code < 200)
            || code == 204 || code == 304
        {
            return Recv::Valid;
        }

        if !self.response.is_chunked() {
            self.receive_body(buf, pos)
        } else {
            self.receive_chunk(buf, pos, response_parsed)
        }
    }

    /// The peer closed the connection: for a close-framed body this is
    /// the end of the message.
    ///
    /// Reports `Valid` only once at least one body byte has arrived;
    /// a close before that leaves the message incomplete.
    pub fn receive_eof(&mut self) -> Recv {
        if self.read_until_close && !self.body.is_empty() {
            Recv::Valid
        } else {
            Recv::Incomplete
        }
    }

    fn receive_body(&mut self, buf: &[u8], pos: &mut usize) -> Recv {
        // if there is a content length header, ensure it's valid
        let content_length = self.response.content_length();
        if content_length < 0 {
            self.clear();
            return Recv::Invalid;
        }

        // Without a content length header the body is framed by the
        // server closing the connection, up to max_body_size bytes.
        // The framing stays undecided until the first body byte; a
        // close before that leaves the message incomplete.
        let rx_size = buf.len() - *pos;
        let has_content_length = self.response.headers()
            .find_id(Id::ContentLength).is_some();
        if !has_content_length && !self.read_until_close {
            if rx_size == 0 {
                return Recv::Incomplete;
            }
            self.read_until_close = true;
        }
        let target = if self.read_until_close {
            self.limits.max_body_size
        } else {
            content_length as u64
        };

        let required = target as usize - self.body.len();
        let take = min(required, rx_size);
        self.body.extend_from_slice(&buf[*pos..*pos + take]);
        *pos += take;

        if self.read_until_close {
            // bytes beyond the close-framing cap
            if *pos < buf.len() {
                self.clear();
                return Recv::Invalid;
            }
        } else if self.body.len() as i64 == content_length {
            return Recv::Valid;
        }
        Recv::Incomplete
    }

    fn receive_chunk(&mut self, buf: &[u8], pos: &mut usize,
        response_parsed: bool)
        -> Recv
    {
        // A chunk parsed previously is cleared, ready for the next one
        if self.chunk.valid() {
            self.chunk.clear();
        }

        // A newly parsed response header is reported to the caller
        // before its chunks, unless the chunks are being concatenated
        // into a single message
        if response_parsed && !self.concatenate_chunks {
            return Recv::Valid;
        }

        if !self.chunk.parse(buf, pos) {
            // a parsing error rather than running out of data
            if *pos < buf.len() || self.chunk.fail() {
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
                return Recv::Valid;
            }
            if (self.body.len() + self.chunk.data().len()) as u64
                > self.limits.max_body_size
            {
                self.clear();
                return Recv::Invalid;
            }
            self.body.extend_from_slice(self.chunk.data());
        }

        Recv::Incomplete
    }
}
