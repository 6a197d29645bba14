use std::sync::Arc;

use limits::Limits;
use server::Config;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            limits: Limits::default(),
            translate_head_to_get: true,
            trace_enabled: false,
            auto_disconnect_on_invalid: false,
            concatenate_chunks: true,
        }
    }

    /// Replace the whole set of parser bounds
    pub fn limits(&mut self, limits: Limits) -> &mut Self {
        self.limits = limits;
        self
    }

    /// Maximum size of a request body, larger requests get `413`
    pub fn max_content_length(&mut self, value: u64) -> &mut Self {
        self.limits.max_content_length = value;
        self
    }

    /// Maximum size of a single request chunk
    pub fn max_chunk_size(&mut self, value: u64) -> &mut Self {
        self.limits.max_chunk_size = value;
        self
    }

    /// Maximum length of a request uri, longer requests get `414`
    pub fn max_uri_length(&mut self, value: usize) -> &mut Self {
        self.limits.max_uri_length = value;
        self
    }

    /// Maximum length of a request method, longer requests get `501`
    pub fn max_method_length(&mut self, value: usize) -> &mut Self {
        self.limits.max_method_length = value;
        self
    }

    /// Reject bare LF line endings
    pub fn strict_crlf(&mut self, value: bool) -> &mut Self {
        self.limits.strict_crlf = value;
        self
    }

    /// Present HEAD requests to the application as GET requests,
    /// keeping an `is_head` flag for the response writer
    pub fn translate_head_to_get(&mut self, value: bool) -> &mut Self {
        self.translate_head_to_get = value;
        self
    }

    /// Permit body-less TRACE requests; the application builds the
    /// echo body itself
    pub fn trace_enabled(&mut self, value: bool) -> &mut Self {
        self.trace_enabled = value;
        self
    }

    /// Close the connection after responding to an invalid request
    pub fn auto_disconnect_on_invalid(&mut self, value: bool) -> &mut Self {
        self.auto_disconnect_on_invalid = value;
        self
    }

    /// Deliver chunked request bodies as one concatenated buffer;
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
