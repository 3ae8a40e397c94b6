use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

impl HttpError {
    /// Returns true if the client failed to deliver a request before the read deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestError { source: ParseError::Timeout { .. } })
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid http uri: {reason}")]
    InvalidUri { reason: String },

    #[error("stream closed after {received} bytes of an unfinished request head")]
    Incomplete { received: usize },

    #[error("no complete request received within {after:?}")]
    Timeout { after: Duration },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_uri<S: ToString>(str: S) -> Self {
        Self::InvalidUri { reason: str.to_string() }
    }

    pub fn incomplete(received: usize) -> Self {
        Self::Incomplete { received }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Returns true if the request bytes themselves were unacceptable, as opposed to
    /// the transport failing or the client going quiet.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Timeout { .. } | Self::Io { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("response head already sent for this request")]
    HeadAlreadySent,

    #[error("response body written before the response head")]
    BodyBeforeHead,

    #[error("response body overflow: {remaining} bytes left but received {received}")]
    BodyOverflow { remaining: u64, received: u64 },

    #[error("response body ended early: promised {expected} bytes, sent {sent}")]
    ShortBody { expected: u64, sent: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn body_overflow(remaining: u64, received: u64) -> Self {
        Self::BodyOverflow { remaining, received }
    }

    pub fn short_body(expected: u64, sent: u64) -> Self {
        Self::ShortBody { expected, sent }
    }
}

/// Why a `Range` header could not be honoured.
///
/// The two variants map to different status codes: a header that does not follow
/// the `bytes=` grammar is a client error (400), while well-formed numbers that fall
/// outside the file are `416 Range Not Satisfiable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("malformed range header: {reason}")]
    Malformed { reason: String },

    #[error("range not satisfiable for a resource of {complete_length} bytes")]
    Unsatisfiable { complete_length: u64 },
}

impl RangeError {
    pub fn malformed<S: ToString>(str: S) -> Self {
        Self::Malformed { reason: str.to_string() }
    }

    pub fn unsatisfiable(complete_length: u64) -> Self {
        Self::Unsatisfiable { complete_length }
    }
}
