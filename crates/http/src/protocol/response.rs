//! HTTP response head handling.
//!
//! A [`ResponseHead`] describes everything written before the body: status line,
//! content type, exact content length and, for partial responses, the content range.
//! Every response closes the connection afterwards, so the head always carries
//! `Connection: close`.

use std::borrow::Cow;
use std::fmt;

use http::StatusCode;

use crate::protocol::ByteRange;

/// Content type used for generated html pages (error pages, command pages).
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Value of the `Content-Range` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRange {
    /// `bytes <first>-<last>/<complete_length>`
    Bytes { first: u64, last: u64, complete_length: u64 },
    /// `bytes */<complete_length>`, sent along with 416
    Unsatisfied { complete_length: u64 },
}

impl From<&ByteRange> for ContentRange {
    fn from(range: &ByteRange) -> Self {
        Self::Bytes { first: range.start(), last: range.last_byte(), complete_length: range.total_length() }
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes { first, last, complete_length } => write!(f, "bytes {first}-{last}/{complete_length}"),
            Self::Unsatisfied { complete_length } => write!(f, "bytes */{complete_length}"),
        }
    }
}

/// The header portion of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: StatusCode,
    content_type: Cow<'static, str>,
    content_length: u64,
    content_range: Option<ContentRange>,
}

impl ResponseHead {
    pub fn new(status: StatusCode, content_type: impl Into<Cow<'static, str>>, content_length: u64) -> Self {
        Self { status, content_type: content_type.into(), content_length, content_range: None }
    }

    /// `200 OK` for a whole resource.
    pub fn ok(content_type: impl Into<Cow<'static, str>>, content_length: u64) -> Self {
        Self::new(StatusCode::OK, content_type, content_length)
    }

    /// `206 Partial Content` covering exactly `range`.
    pub fn partial(content_type: impl Into<Cow<'static, str>>, range: &ByteRange) -> Self {
        Self::new(StatusCode::PARTIAL_CONTENT, content_type, range.len()).with_content_range(range.into())
    }

    /// An html page with the given status.
    pub fn html(status: StatusCode, content_length: u64) -> Self {
        Self::new(status, HTML_CONTENT_TYPE, content_length)
    }

    #[must_use]
    pub fn with_content_range(mut self, content_range: ContentRange) -> Self {
        self.content_range = Some(content_range);
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    #[inline]
    pub fn content_range(&self) -> Option<ContentRange> {
        self.content_range
    }
}
