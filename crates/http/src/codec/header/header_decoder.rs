//! HTTP header decoder implementation for parsing HTTP request heads
//!
//! This module decodes the request line and header fields from raw bytes into a
//! [`Request`]. Parsing of the wire grammar is delegated to `httparse`; this layer
//! adds percent-decoding of the target, header value trimming and size limits.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1 request lines are accepted
//!
//! # Header semantics
//!
//! Header names keep the case the client used. When a name repeats, the last value
//! wins; earlier values are dropped.

use std::collections::HashMap;

use bytes::{Buf, BytesMut};
use httparse::{Error, Status};
use percent_encoding::percent_decode_str;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;

use crate::protocol::{ParseError, Request};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for HTTP request heads implementing the [`Decoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))` if a complete head was parsed; its bytes are consumed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The request line is not `METHOD SP target SP HTTP/1.x`
    /// - The number of headers exceeds `MAX_HEADER_NUM`
    /// - The total header size exceeds `MAX_HEADER_BYTES`
    /// - The target does not percent-decode to UTF-8
    /// - A header value is not UTF-8
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let parsed_result = req.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        let head_size = match parsed_result? {
            Status::Complete(head_size) => head_size,
            // If parsing incomplete, ensure current buffer size does not exceed limit
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        trace!(head_size, "parsed request head");
        ensure!(head_size <= MAX_HEADER_BYTES, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

        // httparse only accepts HTTP/1.x request lines, anything else already failed above
        ensure!(matches!(req.version, Some(0 | 1)), ParseError::InvalidVersion(req.version));

        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let target = req.path.ok_or_else(|| ParseError::invalid_uri("missing request target"))?;
        let uri = percent_decode_str(target)
            .decode_utf8()
            .map_err(|e| ParseError::invalid_uri(format!("{target} does not decode to utf-8: {e}")))?;

        let mut header_map = HashMap::with_capacity(req.headers.len());
        for header in req.headers.iter() {
            let value = std::str::from_utf8(header.value)
                .map_err(|e| ParseError::invalid_header(format!("value of {} is not utf-8: {e}", header.name)))?;
            header_map.insert(header.name.trim().to_owned(), value.trim().to_owned());
        }

        let request = Request::new(method, uri, header_map);

        // the head is consumed, whatever follows belongs to a body we never read
        src.advance(head_size);
        Ok(Some(request))
    }
}
