//! Streaming parsing of header field lines and header blocks.
//!
//! `FieldLine` consumes one `name: value` line byte by byte, folding
//! the name to lowercase as it goes and handling legacy line-folded
//! continuations. `MessageHeaders` drives `FieldLine` across a whole
//! header block (request, response or chunk trailers), merging repeated
//! names and enforcing the cumulative bounds.

use std::collections::HashMap;

use character::is_blank;
use header_field::{self, Id};
use limits::Limits;

/// The outcome of one `receive()` call on a request or response
/// receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recv {
    /// the message is invalid
    Invalid,
    /// the client expects a 100 Continue response
    ExpectContinue,
    /// the message requires more data
    Incomplete,
    /// a valid request or response
    Valid,
    /// a valid chunk received
    Chunk,
}

/// Parsing state of a single header field line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// the header name field
    Name,
    /// the header value leading white space
    ValueLs,
    /// the header value
    Value,
    /// the line feed (if any)
    Lf,
    /// the header line is valid
    Valid,
    /// the header line is longer than `max_line_length`
    ErrorLength,
    /// `strict_crlf` is set and LF was received without CR
    ErrorCrlf,
    /// the whitespace run is longer than `max_whitespace_chars`
    ErrorWs,
}

/// A streaming parser for one HTTP header field line.
#[derive(Debug, Clone)]
pub struct FieldLine {
    limits: Limits,
    name: String,
    value: String,
    length: usize,
    ws_count: usize,
    state: FieldState,
}

impl FieldLine {
    pub fn new(limits: Limits) -> FieldLine {
        FieldLine {
            limits: limits,
            name: String::new(),
            value: String::new(),
            length: 0,
            ws_count: 0,
            state: FieldState::Name,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.name.clear();
        self.value.clear();
        self.length = 0;
        self.ws_count = 0;
        self.state = FieldState::Name;
    }

    fn parse_byte(&mut self, c: u8) -> bool {
        use self::FieldState::*;

        self.length += 1;
        if self.length > self.limits.max_line_length {
            self.state = ErrorLength;
        }

        match self.state {
            Name => {
                if c.is_ascii_alphabetic() || c == b'-' {
                    self.name.push(c.to_ascii_lowercase() as char);
                } else if c == b':' {
                    self.state = ValueLs;
                } else {
                    return false;
                }
            }
            ValueLs => {
                // Ignore leading whitespace, up to a limit
                if is_blank(c) {
                    self.ws_count += 1;
                    if self.ws_count > self.limits.max_whitespace_chars {
                        self.state = ErrorWs;
                        return false;
                    }
                } else {
                    self.state = Value;
                    return self.parse_value_byte(c);
                }
            }
            Value => {
                return self.parse_value_byte(c);
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

    fn parse_value_byte(&mut self, c: u8) -> bool {
        use self::FieldState::*;
        // The header line should end with CRLF
        if c == b'\r' {
            self.state = Lf;
        } else if c == b'\n' {
            if self.limits.strict_crlf {
                self.state = ErrorCrlf;
                return false;
            }
            self.state = Valid;
        } else {
            self.value.push(c as char);
        }
        true
    }

    /// Parse a header field line, lowercasing the name as it is read.
    ///
    /// Consumes bytes from `buf` starting at `*pos`, leaving `*pos` at
    /// the first unread byte. Returns true once the line is valid. A
    /// false return with `*pos < buf.len()` (or `fail()`) is a parse
    /// error; otherwise the line is merely incomplete.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        while *pos < buf.len() && self.state != FieldState::Valid {
            let c = buf[*pos];
            *pos += 1;
            if !self.parse_byte(c) {
                return false;
            }
            if self.state == FieldState::Valid {
                // A following SP/HT marks a folded continuation line:
                // the value grows by a single space and parsing resumes
                // in the leading-whitespace state.
                if *pos < buf.len() && is_blank(buf[*pos]) {
                    self.value.push(' ');
                    self.state = FieldState::ValueLs;
                }
            }
        }
        self.state == FieldState::Valid
    }

    /// The field name, as a lowercase string.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value, in the case it was received in.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The length of the header: name plus value.
    pub fn length(&self) -> usize {
        self.name.len() + self.value.len()
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    /// True if the line hit a terminal error state.
    pub fn fail(&self) -> bool {
        use self::FieldState::*;
        matches!(self.state, ErrorLength | ErrorCrlf | ErrorWs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// reading header field lines
    Fields,
    /// CR of the terminating blank line was consumed
    FinalLf,
    /// the block is terminated
    Valid,
}

/// The collection of HTTP headers received with a request, a response
/// or a chunk (trailers).
///
/// Field names are lowercased before being stored, so lookups must use
/// lowercase names. A repeated field name merges its values: with `;`
/// when the name contains `cookie`, with `,` otherwise.
#[derive(Debug, Clone)]
pub struct MessageHeaders {
    limits: Limits,
    fields: HashMap<String, String>,
    field: FieldLine,
    state: BlockState,
    length: usize,
    fail: bool,
}

impl MessageHeaders {
    pub fn new(limits: Limits) -> MessageHeaders {
        MessageHeaders {
            limits: limits,
            fields: HashMap::new(),
            field: FieldLine::new(limits),
            state: BlockState::Fields,
            length: 0,
            fail: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.field.clear();
        self.state = BlockState::Fields;
        self.length = 0;
        self.fail = false;
    }

    /// Parse a header block from a received request or response.
    ///
    /// Same cursor contract as `FieldLine::parse`; incompleteness is
    /// distinguished from failure by `*pos == buf.len() && !fail()`.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        while self.state == BlockState::Fields {
            match buf.get(*pos) {
                None => return false,
                Some(&b'\r') => {
                    *pos += 1;
                    self.state = BlockState::FinalLf;
                }
                Some(&b'\n') => {
                    if self.limits.strict_crlf {
                        self.fail = true;
                        return false;
                    }
                    *pos += 1;
                    self.state = BlockState::Valid;
                }
                Some(_) => {
                    if !self.field.parse(buf, pos) {
                        self.fail = self.field.fail() || *pos < buf.len();
                        return false;
                    }
                    self.length += self.field.length();
                    let name = self.field.name().to_string();
                    let value = self.field.value().to_string();
                    self.add(&name, &value);
                    self.field.clear();

                    if self.length > self.limits.max_header_length
                        || self.fields.len() > self.limits.max_header_number
                    {
                        self.fail = true;
                        return false;
                    }
                }
            }
        }
        if self.state == BlockState::FinalLf {
            match buf.get(*pos) {
                None => return false,
                Some(&b'\n') => {
                    *pos += 1;
                    self.state = BlockState::Valid;
                }
                Some(_) => {
                    self.fail = true;
                    return false;
                }
            }
        }
        true
    }

    /// Add a header to the collection, merging duplicates.
    ///
    /// `name` must already be lowercase.
    pub fn add(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.fields.get_mut(name) {
            let separator =
                if name.contains("cookie") { ';' } else { ',' };
            existing.push(separator);
            existing.push_str(value);
            return;
        }
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// Find the value for a given (lowercase) header name.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| &v[..])
    }

    /// Find the value for a given standard header id.
    pub fn find_id(&self, field_id: Id) -> Option<&str> {
        self.find(field_id.lowercase_name())
    }

    /// The value of the `Content-Length` field.
    ///
    /// Returns 0 if the field is absent and -1 if it is present but
    /// not a valid number.
    pub fn content_length(&self) -> i64 {
        match self.find_id(Id::ContentLength) {
            None => 0,
            Some(value) => {
                match ::character::from_dec_string(value.trim()) {
                    Some(n) if n <= i64::max_value() as u64 => n as i64,
                    _ => -1,
                }
            }
        }
    }

    /// Whether chunked transfer coding is applied to the message.
    ///
    /// True if there is a transfer-encoding header and its value does
    /// NOT contain the keyword `identity`, RFC 2616 section 4.4.
    pub fn is_chunked(&self) -> bool {
        match self.find_id(Id::TransferEncoding) {
            None => false,
            Some(value) => !value_contains(value, "identity"),
        }
    }

    /// Whether the connection should be closed after this message.
    pub fn close_connection(&self) -> bool {
        match self.find_id(Id::Connection) {
            None => false,
            Some(value) => value_contains(value, "close"),
        }
    }

    /// Whether the client expects a `100 Continue` response.
    pub fn expect_continue(&self) -> bool {
        match self.find_id(Id::Expect) {
            None => false,
            Some(value) => value_contains(value, "100-continue"),
        }
    }

    /// Whether the terminating blank line has been consumed.
    pub fn valid(&self) -> bool {
        self.state == BlockState::Valid
    }

    /// True if parsing hit a terminal error.
    pub fn fail(&self) -> bool {
        self.fail
    }

    /// Accessor for the header fields.
    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// Re-emit the header block as field lines.
    ///
    /// The terminating blank line is deliberately not appended, so the
    /// output still passes through `are_headers_split`.
    pub fn to_string(&self) -> String {
        let mut output = String::new();
        for (name, value) in &self.fields {
            output.push_str(&header_field::to_header(name, value));
        }
        output
    }
}

/// Case-insensitive substring test for header values.
pub fn value_contains(value: &str, token: &str) -> bool {
    value.to_ascii_lowercase().contains(token)
}

/// Whether a header string contains an embedded blank line, which
/// would split the message in two on the wire.
///
/// An LF whose previous byte is LF, or whose previous byte is CR with
/// an LF before that, is a premature terminator.
pub fn are_headers_split(headers: &str) -> bool {
    let mut prev = b'0';
    let mut pprev = b'0';
    for &c in headers.as_bytes() {
        if c == b'\n' {
            if prev == b'\n' {
                return true;
            } else if prev == b'\r' && pprev == b'\n' {
                return true;
            }
        }
        pprev = prev;
        prev = c;
    }
    false
}

#[cfg(test)]
mod test {
    use limits::Limits;
    use super::*;

    fn parse_line(line: &FieldLine, data: &[u8]) -> (FieldLine, usize, bool) {
        let mut line = line.clone();
        let mut pos = 0;
        let ok = line.parse(data, &mut pos);
        (line, pos, ok)
    }

    #[test]
    fn simple_field_line() {
        let (line, pos, ok) = parse_line(
            &FieldLine::new(Limits::default()),
            b"Content-Length: 42\r\n");
        assert!(ok);
        assert_eq!(pos, 20);
        assert_eq!(line.name(), "content-length");
        assert_eq!(line.value(), "42");
        assert_eq!(line.length(), 16);
    }

    #[test]
    fn field_line_rejects_bad_name_byte() {
        let (line, _, ok) = parse_line(
            &FieldLine::new(Limits::default()),
            b"Content Length: 42\r\n");
        assert!(!ok);
        assert_eq!(line.state(), FieldState::Name);
    }

    #[test]
    fn field_line_strict_crlf() {
        let mut limits = Limits::default();
        limits.strict_crlf = true;
        let (line, _, ok) = parse_line(
            &FieldLine::new(limits), b"Accept: */*\n");
        assert!(!ok);
        assert!(line.fail());
        assert_eq!(line.state(), FieldState::ErrorCrlf);

        let (_, _, ok) = parse_line(
            &FieldLine::new(limits), b"Accept: */*\r\n");
        assert!(ok);
    }

    #[test]
    fn field_line_folded_continuation() {
        let (line, pos, ok) = parse_line(
            &FieldLine::new(Limits::default()),
            b"Accept: text/html,\r\n\tapplication/xml\r\n");
        assert!(ok);
        assert_eq!(line.value(), "text/html, application/xml");
        assert_eq!(pos, 38);
    }

    #[test]
    fn field_line_length_cap() {
        let mut limits = Limits::default();
        limits.max_line_length = 16;
        // name + colon + space + value + crlf == 16 bytes: just fits
        let (_, _, ok) = parse_line(
            &FieldLine::new(limits), b"Accept: text/x\r\n");
        assert!(ok);
        let (line, _, ok) = parse_line(
            &FieldLine::new(limits), b"Accept: text/xy\r\n");
        assert!(!ok);
        assert_eq!(line.state(), FieldState::ErrorLength);
    }

    #[test]
    fn field_line_whitespace_cap() {
        let mut limits = Limits::default();
        limits.max_whitespace_chars = 3;
        let (_, _, ok) = parse_line(
            &FieldLine::new(limits), b"Host:   x\r\n");
        assert!(ok);
        let (line, _, ok) = parse_line(
            &FieldLine::new(limits), b"Host:    x\r\n");
        assert!(!ok);
        assert_eq!(line.state(), FieldState::ErrorWs);
    }

    fn parse_block(data: &[u8]) -> (MessageHeaders, usize, bool) {
        let mut headers = MessageHeaders::new(Limits::default());
        let mut pos = 0;
        let ok = headers.parse(data, &mut pos);
        (headers, pos, ok)
    }

    #[test]
    fn empty_block() {
        let (headers, pos, ok) = parse_block(b"\r\n");
        assert!(ok);
        assert!(headers.valid());
        assert_eq!(pos, 2);
        assert_eq!(headers.content_length(), 0);
        assert!(!headers.is_chunked());
    }

    #[test]
    fn lowercased_keys() {
        let (headers, _, ok) = parse_block(
            b"HOST: example.com\r\nCoNTent-LENgth: 7\r\n\r\n");
        assert!(ok);
        assert_eq!(headers.find("host"), Some("example.com"));
        assert_eq!(headers.content_length(), 7);
        assert_eq!(headers.find("HOST"), None);
    }

    #[test]
    fn merging_repeated_names() {
        let (headers, _, ok) = parse_block(
            b"Accept: text/html\r\nAccept: text/plain\r\n\r\n");
        assert!(ok);
        assert_eq!(headers.find("accept"), Some("text/html,text/plain"));

        let (headers, _, ok) = parse_block(
            b"Set-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n");
        assert!(ok);
        assert_eq!(headers.find("set-cookie"), Some("a=1;b=2"));
    }

    #[test]
    fn content_length_invalid() {
        let (headers, _, ok) = parse_block(
            b"Content-Length: 4x\r\n\r\n");
        assert!(ok);
        assert_eq!(headers.content_length(), -1);
    }

    #[test]
    fn chunked_and_identity() {
        let (headers, _, _) = parse_block(
            b"Transfer-Encoding: Chunked\r\n\r\n");
        assert!(headers.is_chunked());
        let (headers, _, _) = parse_block(
            b"Transfer-Encoding: Identity\r\n\r\n");
        assert!(!headers.is_chunked());
    }

    #[test]
    fn close_and_continue_queries() {
        let (headers, _, _) = parse_block(
            b"Connection: Keep-Alive, Close\r\nExpect: 100-Continue\r\n\r\n");
        assert!(headers.close_connection());
        assert!(headers.expect_continue());
        let (headers, _, _) = parse_block(
            b"Connection: keep-alive\r\n\r\n");
        assert!(!headers.close_connection());
        assert!(!headers.expect_continue());
    }

    #[test]
    fn header_number_cap() {
        let mut limits = Limits::default();
        limits.max_header_number = 2;
        let mut headers = MessageHeaders::new(limits);
        let mut pos = 0;
        let ok = headers.parse(
            b"A: 1\r\nB: 2\r\nC: 3\r\n\r\n", &mut pos);
        assert!(!ok);
        assert!(headers.fail());
    }

    #[test]
    fn header_length_cap() {
        let mut limits = Limits::default();
        limits.max_header_length = 8;
        let mut headers = MessageHeaders::new(limits);
        let mut pos = 0;
        // "accept" + "ab" == 8 bytes cumulative: just fits
        assert!(headers.parse(b"Accept: ab\r\n\r\n", &mut pos));
        let mut headers = MessageHeaders::new(limits);
        let mut pos = 0;
        assert!(!headers.parse(b"Accept: abc\r\n\r\n", &mut pos));
        assert!(headers.fail());
    }

    #[test]
    fn incomplete_block_resumes() {
        let mut headers = MessageHeaders::new(Limits::default());
        let data = b"Host: example.com\r\n\r\n";
        for split in 1..data.len() - 1 {
            headers.clear();
            let mut pos = 0;
            assert!(!headers.parse(&data[..split], &mut pos),
                    "split at {}", split);
            assert!(!headers.fail(), "split at {}", split);
            let mut pos2 = 0;
            assert!(headers.parse(&data[split..], &mut pos2),
                    "split at {}", split);
            assert_eq!(headers.find("host"), Some("example.com"));
        }
    }

    #[test]
    fn to_string_has_no_blank_line() {
        let (headers, _, _) = parse_block(b"Host: x\r\n\r\n");
        assert_eq!(headers.to_string(), "host: x\r\n");
        assert!(!are_headers_split(&headers.to_string()));
    }

    #[test]
    fn split_detection() {
        assert!(!are_headers_split(""));
        assert!(!are_headers_split("X-One: a\r\nX-Two: b\r\n"));
        assert!(are_headers_split("X-Evil: a\r\n\r\nGET /b HTTP/1.1\r\n"));
        assert!(are_headers_split("X-Evil: a\n\nGET /b HTTP/1.1\r\n"));
        assert!(are_headers_split("X-Evil: a\r\n\nx"));
    }
}
