//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! Writes the status line followed by `Content-Type`, an optional `Content-Range`,
//! `Content-Length` and `Connection: close`, then the blank line that ends the head.

use crate::protocol::{ResponseHead, SendError};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 256;

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<ResponseHead> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, head: ResponseHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = head.status();
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or_default())?;
        write!(FastWrite(dst), "Content-Type: {}\r\n", head.content_type())?;
        if let Some(content_range) = head.content_range() {
            write!(FastWrite(dst), "Content-Range: {content_range}\r\n")?;
        }
        write!(FastWrite(dst), "Content-Length: {}\r\n", head.content_length())?;
        dst.put_slice(b"Connection: close\r\n");
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
