//! Parsing and encoding of the chunked transfer coding, RFC 7230
//! section 4.1.
//!
//! A chunk is a hex size line (with optional extension), the payload
//! bytes and a trailing CRLF. The terminating zero-sized chunk carries
//! an optional trailer header block instead of data.

use character::{is_blank, from_hex_string, CRLF};
use headers::MessageHeaders;
use limits::Limits;

/// Enough hex digits for a 64 bit number.
const MAX_SIZE_DIGITS: usize = 16;

/// Parsing state of a chunk header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// leading white space
    SizeLs,
    /// the chunk size hex text
    Size,
    /// chunk extension leading white space
    ExtensionLs,
    /// the chunk extension
    Extension,
    /// the line feed
    Lf,
    /// the chunk header is valid
    Valid,
    /// the header is longer than `max_line_length`
    ErrorLength,
    /// `strict_crlf` is set and LF was received without CR
    ErrorCrlf,
    /// the whitespace run is longer than `max_whitespace_chars`
    ErrorWs,
    /// the chunk size is greater than `max_chunk_size`
    ErrorSize,
}

/// A streaming parser for one chunk header line.
#[derive(Debug, Clone)]
pub struct ChunkHeader {
    limits: Limits,
    size: u64,
    length: usize,
    ws_count: usize,
    hex_size: String,
    extension: String,
    state: ChunkState,
    size_read: bool,
    valid: bool,
}

impl ChunkHeader {
    pub fn new(limits: Limits) -> ChunkHeader {
        ChunkHeader {
            limits: limits,
            size: 0,
            length: 0,
            ws_count: 0,
            hex_size: String::new(),
            extension: String::new(),
            state: ChunkState::SizeLs,
            size_read: false,
            valid: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.size = 0;
        self.length = 0;
        self.ws_count = 0;
        self.hex_size.clear();
        self.extension.clear();
        self.state = ChunkState::SizeLs;
        self.size_read = false;
        self.valid = false;
    }

    fn read_size(&mut self) -> bool {
        match from_hex_string(&self.hex_size) {
            Some(size) if size <= self.limits.max_chunk_size => {
                self.size = size;
                self.size_read = true;
                true
            }
            _ => {
                self.state = ChunkState::ErrorSize;
                false
            }
        }
    }

    fn parse_byte(&mut self, c: u8) -> bool {
        use self::ChunkState::*;

        self.length += 1;
        if self.length > self.limits.max_line_length {
            self.state = ErrorLength;
        }

        match self.state {
            SizeLs => {
                // Ignore leading whitespace, up to a limit
                if is_blank(c) {
                    self.ws_count += 1;
                    if self.ws_count > self.limits.max_whitespace_chars {
                        self.state = ErrorWs;
                        return false;
                    }
                } else {
                    self.state = Size;
                    return self.parse_size_byte(c);
                }
            }
            Size => {
                return self.parse_size_byte(c);
            }
            ExtensionLs => {
                if is_blank(c) {
                    self.ws_count += 1;
                    if self.ws_count > self.limits.max_whitespace_chars {
                        self.state = ErrorWs;
                        return false;
                    }
                } else {
                    self.state = Extension;
                    return self.parse_extension_byte(c);
                }
            }
            Extension => {
                return self.parse_extension_byte(c);
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

    fn parse_size_byte(&mut self, c: u8) -> bool {
        use self::ChunkState::*;
        if (c as char).is_digit(16) {
            self.hex_size.push(c as char);
            if self.hex_size.len() > MAX_SIZE_DIGITS {
                self.state = ErrorSize;
                return false;
            }
            return true;
        }
        match c {
            b';' => {
                if !self.read_size() {
                    return false;
                }
                self.ws_count = 0;
                self.state = ExtensionLs;
            }
            b'\r' => {
                if !self.read_size() {
                    return false;
                }
                self.state = Lf;
            }
            b'\n' => {
                if !self.read_size() {
                    return false;
                }
                if self.limits.strict_crlf {
                    self.state = ErrorCrlf;
                    return false;
                }
                self.state = Valid;
            }
            _ => return false,
        }
        true
    }

    fn parse_extension_byte(&mut self, c: u8) -> bool {
        use self::ChunkState::*;
        match c {
            b'\r' => self.state = Lf,
            b'\n' => {
                if self.limits.strict_crlf {
                    self.state = ErrorCrlf;
                    return false;
                }
                self.state = Valid;
            }
            _ => self.extension.push(c as char),
        }
        true
    }

    /// Parse a chunk size line.
    ///
    /// Same cursor contract as the other line parsers: false with
    /// bytes left (or `fail()`) is an error, false at the end of the
    /// buffer means more data is needed.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        while *pos < buf.len() && self.state != ChunkState::Valid {
            let c = buf[*pos];
            *pos += 1;
            if !self.parse_byte(c) {
                return false;
            }
        }
        self.valid = self.state == ChunkState::Valid;
        self.valid
    }

    /// The chunk size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The chunk size as the received hex string.
    pub fn hex_size(&self) -> &str {
        &self.hex_size
    }

    /// The chunk extension, blank if none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// True if the header hit a terminal error state.
    pub fn fail(&self) -> bool {
        use self::ChunkState::*;
        matches!(self.state, ErrorLength | ErrorCrlf | ErrorWs | ErrorSize)
    }

    /// Whether this is the terminating chunk.
    pub fn is_last(&self) -> bool {
        self.size == 0
    }
}

/// A received chunk: the header, the payload and, for the terminating
/// chunk only, the trailer headers.
#[derive(Debug, Clone)]
pub struct RxChunk {
    limits: Limits,
    header: ChunkHeader,
    data: Vec<u8>,
    trailers: MessageHeaders,
    cr_seen: bool,
    fail: bool,
    valid: bool,
}

impl RxChunk {
    pub fn new(limits: Limits) -> RxChunk {
        RxChunk {
            limits: limits,
            header: ChunkHeader::new(limits),
            data: Vec::new(),
            trailers: MessageHeaders::new(limits),
            cr_seen: false,
            fail: false,
            valid: false,
        }
    }

    /// Reset to the initial state, keeping the configured bounds.
    pub fn clear(&mut self) {
        self.header.clear();
        self.data.clear();
        self.trailers.clear();
        self.cr_seen = false;
        self.fail = false;
        self.valid = false;
    }

    /// Parse an HTTP chunk.
    ///
    /// On a valid return `*pos` refers to the start of the next chunk,
    /// the start of the next message, or the end of the buffer.
    pub fn parse(&mut self, buf: &[u8], pos: &mut usize) -> bool {
        if !self.header.valid() && !self.header.parse(buf, pos) {
            return false;
        }

        // Only the last chunk has a trailer.
        if self.header.is_last() {
            if !self.trailers.parse(buf, pos) {
                return false;
            }
        } else {
            let size = self.header.size() as usize;
            if self.data.len() < size {
                let required = size - self.data.len();
                let available = buf.len() - *pos;
                let take = if available < required { available } else { required };
                self.data.extend_from_slice(&buf[*pos..*pos + take]);
                *pos += take;
                if self.data.len() < size {
                    return false;
                }
            }

            // The data must be followed by CRLF, or a bare LF when
            // not strict.
            if !self.cr_seen {
                match buf.get(*pos) {
                    None => return false,
                    Some(&b'\r') => {
                        *pos += 1;
                        self.cr_seen = true;
                    }
                    Some(&b'\n') if !self.limits.strict_crlf => {
                        *pos += 1;
                        self.valid = true;
                        return true;
                    }
                    Some(_) => {
                        self.fail = true;
                        return false;
                    }
                }
            }
            match buf.get(*pos) {
                None => return false,
                Some(&b'\n') => {
                    *pos += 1;
                }
                Some(_) => {
                    self.fail = true;
                    return false;
                }
            }
        }

        self.valid = true;
        true
    }

    /// The chunk size in bytes.
    pub fn size(&self) -> u64 {
        self.header.size()
    }

    /// The chunk extension, blank if none.
    pub fn extension(&self) -> &str {
        self.header.extension()
    }

    /// Whether this is the terminating chunk.
    pub fn is_last(&self) -> bool {
        self.header.is_last()
    }

    /// The data contained in the chunk.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The trailer headers of the terminating chunk.
    pub fn trailers(&self) -> &MessageHeaders {
        &self.trailers
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// True if parsing hit a terminal error.
    pub fn fail(&self) -> bool {
        self.fail || self.header.fail() || self.trailers.fail()
    }
}

/// Encode a chunk header line for `size` bytes of data.
pub fn chunk_header(size: u64, extension: &str) -> String {
    let mut output = format!("{:x}", size);
    if !extension.is_empty() {
        output.push_str("; ");
        output.push_str(extension);
    }
    output.push_str(CRLF);
    output
}

/// The terminating chunk of a chunked message, with optional extension
/// and trailers.
#[derive(Debug, Clone)]
pub struct LastChunk {
    extension: String,
    trailer_string: String,
}

impl LastChunk {
    pub fn new(extension: &str, trailer_string: &str) -> LastChunk {
        LastChunk {
            extension: extension.to_string(),
            trailer_string: trailer_string.to_string(),
        }
    }

    /// Add a trailer field line.
    pub fn add_trailer(&mut self, field: &str, value: &str) {
        self.trailer_string
            .push_str(&::header_field::to_header(field, value));
    }

    /// `0` `[; extension]` CRLF trailers CRLF.
    pub fn to_string(&self) -> String {
        let mut output = String::from("0");
        if !self.extension.is_empty() {
            output.push_str("; ");
            output.push_str(&self.extension);
        }
        output.push_str(CRLF);
        output.push_str(&self.trailer_string);
        output.push_str(CRLF);
        output
    }
}
