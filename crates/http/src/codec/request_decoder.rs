//! HTTP request decoder module
//!
//! [`RequestDecoder`] turns the bytes of a connection into at most one [`Request`].
//! Request bodies are never read; once the head is decoded the connection is
//! answered and closed.
//!
//! # Example
//!
//! ```
//! use seekserve_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /song.mp3 HTTP/1.1\r\nRange: bytes=0-\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.uri(), "/song.mp3");
//! ```

use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, Request};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder for HTTP request heads.
///
/// End of stream is classified by [`Decoder::decode_eof`]:
/// - nothing (or only blank lines) received: `Ok(None)`, the client closed without asking
/// - an unfinished head: [`ParseError::Incomplete`]
#[derive(Debug, Default)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.header_decoder.decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        if src.iter().all(|b| matches!(b, b'\r' | b'\n')) {
            src.clear();
            return Ok(None);
        }

        Err(ParseError::incomplete(src.len()))
    }
}
