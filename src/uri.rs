//! Splitting a request target into path, query and fragment.
//!
//! Splitting only: no percent-decoding, no dot-segment removal, no
//! normalization of any kind.

/// The parts of a request uri, split at the first `?` and `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    path: String,
    query: String,
    fragment: String,
}

impl RequestUri {
    /// Split a request uri into its parts.
    pub fn new(uri: &str) -> RequestUri {
        let query_start = uri.find('?');
        let fragment_start = uri.find('#');

        let path_end = match (query_start, fragment_start) {
            (Some(q), Some(f)) if q < f => q,
            (Some(q), None) => q,
            (_, Some(f)) => f,
            (None, None) => uri.len(),
        };
        let query = match query_start {
            Some(q) if q == path_end => {
                let end = fragment_start.unwrap_or(uri.len());
                &uri[q + 1..end]
            }
            _ => "",
        };
        let fragment = match fragment_start {
            Some(f) => &uri[f + 1..],
            None => "",
        };
        RequestUri {
            path: uri[..path_end].to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        }
    }

    /// The path of the uri.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The (optional) query of the uri.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The (optional) fragment of the uri.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}
