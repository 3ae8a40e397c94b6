//! Ordered response output for one connection.

use crate::codec::ResponseEncoder;
use crate::protocol::{Message, ResponseHead, SendError};
use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::trace;

/// Writes a single response to the client: the head first, then exactly the body
/// bytes the head announced.
///
/// All bytes pass through a [`ResponseEncoder`], so a second head, body bytes before
/// the head, or a body longer than its `Content-Length` are refused with a
/// [`SendError`] before anything reaches the socket.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
    committed: bool,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 8 * 1024)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new(), committed: false }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Returns true once a head has been accepted for this response.
    #[inline]
    pub fn head_sent(&self) -> bool {
        self.encoder.head_sent()
    }

    /// Returns true once any response byte has reached the underlying writer.
    #[inline]
    pub fn committed(&self) -> bool {
        self.committed
    }

    /// Body bytes promised by the head that have not been written yet.
    #[inline]
    pub fn body_remaining(&self) -> u64 {
        self.encoder.body_remaining()
    }

    /// Sends the response head.
    ///
    /// When a body follows, the head stays buffered so it leaves together with the first
    /// body chunk; a bodiless head is flushed immediately.
    pub async fn send_head(&mut self, head: ResponseHead) -> Result<(), SendError> {
        trace!(status = %head.status(), content_length = head.content_length(), "sending response head");
        let has_body = head.content_length() > 0;
        self.encoder.encode(Message::<_, &[u8]>::Header(head), &mut self.buffer)?;
        if !has_body {
            self.flush().await?;
        }
        Ok(())
    }

    /// Writes one body chunk and flushes it to the client.
    pub async fn write_body(&mut self, chunk: &[u8]) -> Result<(), SendError> {
        self.encoder.encode(Message::Payload(chunk), &mut self.buffer)?;
        self.flush().await
    }

    /// Sends a complete response whose body is already in memory.
    pub async fn send_page(&mut self, head: ResponseHead, body: &str) -> Result<(), SendError> {
        self.encoder.encode(Message::<_, &[u8]>::Header(head), &mut self.buffer)?;
        self.encoder.encode(Message::<ResponseHead, _>::Payload(body.as_bytes()), &mut self.buffer)?;
        self.flush().await
    }

    /// Sends an html error page for `status` with a short explanation.
    pub async fn send_error(&mut self, status: StatusCode, detail: &str) -> Result<(), SendError> {
        let body = error_page(status, detail);
        self.send_page(ResponseHead::html(status, body.len() as u64), &body).await
    }

    #[inline]
    pub async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.committed = true;
        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }

    /// Drops whatever is still buffered without sending it.
    ///
    /// Returns true when nothing had reached the client yet; the writer is then reset
    /// and a fresh response may be sent. Once bytes are out the response can't be
    /// replaced and the connection has to be dropped.
    pub fn discard(&mut self) -> bool {
        if !self.buffer.is_empty() {
            trace!(dropped = self.buffer.len(), committed = self.committed, "discarding buffered response bytes");
            self.buffer.clear();
        }

        if self.committed {
            return false;
        }
        self.encoder = ResponseEncoder::new();
        true
    }

    /// Flushes anything still buffered and shuts the write side down.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        self.flush().await?;
        Ok(self.writer.shutdown().await?)
    }
}

/// Renders the html body used for error responses.
pub fn error_page(status: StatusCode, detail: &str) -> String {
    let reason = status.canonical_reason().unwrap_or_default();
    format!("<h1>{} {reason}</h1><p>{detail}</p>", status.as_str())
}
