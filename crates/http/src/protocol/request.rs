//! HTTP request value handed from the decoder to the handler.
//!
//! A [`Request`] is built once per connection by the
//! [`RequestDecoder`](crate::codec::RequestDecoder) and is read-only afterwards.

use std::collections::HashMap;

/// Name of the request header carrying a byte range.
pub const RANGE: &str = "Range";

/// A parsed HTTP request head.
///
/// - `method` is kept as received, no validation beyond the request-line grammar
/// - `uri` is already percent-decoded and still carries its query component
/// - header names keep the case the client sent; lookups are exact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    uri: String,
    headers: HashMap<String, String>,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self { method: method.into(), uri: uri.into(), headers }
    }

    /// Returns the request method, e.g. `GET`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the decoded request target, including any `?query` suffix.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns all headers of the request.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks up a header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns the raw `Range` header value if the client sent one.
    pub fn range(&self) -> Option<&str> {
        self.header(RANGE)
    }
}
