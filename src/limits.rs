//! Runtime parser bounds.
//!
//! Every variable-length field a peer controls is capped. The caps are
//! plain data fixed when a receiver is built and never change while
//! parsing.

/// The default maximum size of a message body or chunk, 1 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 1048576;

/// Parser bounds for received messages.
///
/// A `Limits` value is copied into every parser a receiver owns, so a
/// connection can be configured independently of any other.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum length of a request URI (request parsing only).
    pub max_uri_length: usize,
    /// Maximum length of a request method (request parsing only).
    pub max_method_length: usize,
    /// Maximum response status number (response parsing only).
    pub max_status_number: u16,
    /// Maximum length of a response reason phrase (response only).
    pub max_reason_length: usize,
    /// Maximum number of header lines in one header block.
    pub max_header_number: usize,
    /// Maximum cumulative length of all header names and values.
    pub max_header_length: usize,
    /// Maximum length of a single header field line.
    pub max_line_length: usize,
    /// Maximum run of consecutive SP/HT characters.
    pub max_whitespace_chars: usize,
    /// Reject bare LF line endings when set.
    pub strict_crlf: bool,
    /// Maximum size of a request body, 413 when exceeded.
    pub max_content_length: u64,
    /// Maximum size of a single chunk.
    pub max_chunk_size: u64,
    /// Maximum size of a response body framed by connection close.
    pub max_body_size: u64,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_uri_length: 8190,
            max_method_length: 8,
            max_status_number: 65534,
            max_reason_length: 65534,
            max_header_number: 100,
            max_header_length: 8190,
            max_line_length: 1024,
            max_whitespace_chars: 8,
            strict_crlf: false,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_chunk_size: DEFAULT_MAX_CONTENT_LENGTH,
            max_body_size: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}
