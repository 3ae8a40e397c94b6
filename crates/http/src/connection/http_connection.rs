use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{debug, trace, warn};

use crate::codec::RequestDecoder;
use crate::connection::ResponseWriter;
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request};

/// Default bound on how long a client may take to deliver its request head.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a connection is in its single request/response lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    AwaitingRequest,
    Parsed,
    Dispatching,
    ServingFile,
    RunningCommand,
    Responded,
    Closed,
}

/// An HTTP connection that answers exactly one request and then closes.
///
/// `HttpConnection` handles the lifecycle of a connection:
/// - Reading and decoding the request head, bounded by a read timeout
/// - Answering malformed requests with `400 Bad Request`
/// - Handing well-formed requests to a [`Handler`]
/// - Shutting the write side down on every exit path
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: ResponseWriter<W>,
    read_timeout: Duration,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            writer: ResponseWriter::new(writer),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Processes the connection to completion.
    ///
    /// Returns `Ok(())` when a response was delivered or the client closed without
    /// sending anything. A timeout is reported as [`ParseError::Timeout`] (see
    /// [`HttpError::is_timeout`]) and gets no response.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let result = self.do_process(handler.as_ref()).await;

        // a failed response must not be completed by flushing what is left of it
        if let Err(HttpError::ResponseError { source }) = &result {
            let committed = !self.writer.discard();
            warn!(cause = %source, committed, "response failed, dropping unsent bytes");
        }

        // whatever happened above, the connection ends here
        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "shutdown connection error");
        }
        trace!(state = ?ConnectionState::Closed);

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
    {
        trace!(state = ?ConnectionState::AwaitingRequest);
        let Some(request) = self.read_request().await? else {
            debug!("client closed the connection without sending a request");
            return Ok(());
        };

        trace!(state = ?ConnectionState::Parsed, method = request.method(), uri = request.uri());
        trace!(state = ?ConnectionState::Dispatching);
        handler.call(&request, &mut self.writer).await?;

        trace!(state = ?ConnectionState::Responded);
        Ok(())
    }

    async fn read_request(&mut self) -> Result<Option<Request>, HttpError> {
        let next = match tokio::time::timeout(self.read_timeout, self.framed_read.next()).await {
            Ok(next) => next,
            Err(_elapsed) => {
                warn!(timeout = ?self.read_timeout, "no request received in time");
                return Err(ParseError::timeout(self.read_timeout).into());
            }
        };

        match next {
            Some(Ok(request)) => Ok(Some(request)),

            Some(Err(e)) if e.is_malformed() => {
                warn!(cause = %e, "can't decode request, answering bad request");
                self.writer.send_error(StatusCode::BAD_REQUEST, "Malformed request.").await?;
                Err(e.into())
            }

            Some(Err(e)) => Err(e.into()),

            None => Ok(None),
        }
    }
}
