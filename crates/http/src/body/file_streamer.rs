use std::io::SeekFrom;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite};
use tracing::{debug, error};

use crate::connection::ResponseWriter;
use crate::protocol::SendError;

/// Size of each read from the file.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Streams `count` bytes of a file, starting at `start`, as a response body.
///
/// The transfer is bounded by `count`, never by the buffer size: the last read is
/// shortened to what is still owed. Reaching end of file before `count` bytes is an
/// error, because the response head has already promised that many bytes.
#[derive(Debug)]
pub struct FileStreamer<F> {
    file: F,
    start: u64,
    count: u64,
}

impl<F> FileStreamer<F>
where
    F: AsyncRead + AsyncSeek + Unpin,
{
    pub fn new(file: F, start: u64, count: u64) -> Self {
        Self { file, start, count }
    }

    /// Copies the window into `writer` and returns the number of bytes sent.
    ///
    /// Any error leaves the response half-written; the caller must abort the
    /// connection rather than try to send anything else.
    pub async fn stream_to<W>(mut self, writer: &mut ResponseWriter<W>) -> Result<u64, SendError>
    where
        W: AsyncWrite + Unpin,
    {
        self.file.seek(SeekFrom::Start(self.start)).await?;

        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut sent = 0u64;

        while sent < self.count {
            let want = usize::try_from(self.count - sent).map_or(CHUNK_SIZE, |left| left.min(CHUNK_SIZE));
            let read = match self.file.read(&mut buffer[..want]).await {
                Ok(read) => read,
                Err(e) => {
                    error!(cause = %e, sent, expected = self.count, "read file error while streaming");
                    return Err(e.into());
                }
            };

            if read == 0 {
                error!(sent, expected = self.count, "file ended before the promised length");
                return Err(SendError::short_body(self.count, sent));
            }

            writer.write_body(&buffer[..read]).await?;
            sent += read as u64;
        }

        debug!(start = self.start, sent, "finished streaming file window");
        Ok(sent)
    }
}
