use std::sync::Arc;

use client::Config;
use limits::Limits;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            limits: Limits::default(),
            concatenate_chunks: true,
        }
    }

    /// Replace the whole set of parser bounds
    pub fn limits(&mut self, limits: Limits) -> &mut Self {
        self.limits = limits;
        self
    }

    /// Maximum size of a response body framed by connection close
    pub fn max_body_size(&mut self, value: u64) -> &mut Self {
        self.limits.max_body_size = value;
        self
    }

    /// Maximum size of a single response chunk
    pub fn max_chunk_size(&mut self, value: u64) -> &mut Self {
        self.limits.max_chunk_size = value;
        self
    }

    /// Maximum response status number
    pub fn max_status_number(&mut self, value: u16) -> &mut Self {
        self.limits.max_status_number = value;
        self
    }

    /// Maximum length of a response reason phrase
    pub fn max_reason_length(&mut self, value: usize) -> &mut Self {
        self.limits.max_reason_length = value;
        self
    }

    /// Reject bare LF line endings
    pub fn strict_crlf(&mut self, value: bool) -> &mut Self {
        self.limits.strict_crlf = value;
        self
    }

    /// Deliver chunked response bodies as one concatenated buffer;
    /// disable to receive chunk-by-chunk callbacks
    pub fn concatenate_chunks(&mut self, value: bool) -> &mut Self {
        self.concatenate_chunks = value;
        self
    }

    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}
