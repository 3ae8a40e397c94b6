use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use seekserve_http::body::FileStreamer;
use seekserve_http::connection::{ConnectionState, ResponseWriter, error_page};
use seekserve_http::handler::Handler;
use seekserve_http::protocol::{ByteRange, ContentRange, HTML_CONTENT_TYPE, RangeError, Request, ResponseHead, SendError};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};
use tracing::{debug, error, info, trace, warn};

use crate::command::{Command, CommandTable};
use crate::config::Config;
use crate::error::ServerError;
use crate::mime::{OCTET_STREAM, mime_type};
use crate::playlist::{HttpPlaylistSource, PlaylistSource};
use crate::resolver::{PathResolver, ResolvedPath};
use crate::system::{CommandSystemController, SystemController};

pub const PLAYLIST_CONTENT_TYPE: &str = "audio/x-mpegurl; charset=UTF-8";

pub const SUSPEND_PAGE: &str =
    "<!DOCTYPE html><html><head><title>Success</title></head><body><h1>PC is going to sleep...</h1></body></html>";

const NOT_FOUND_DETAIL: &str = "The requested file was not found.";
const FORBIDDEN_DETAIL: &str = "Access to this resource is forbidden.";
const BAD_RANGE_DETAIL: &str = "Invalid Range header format.";
const UNSATISFIABLE_DETAIL: &str = "The requested range is not valid.";
const READ_FAILED_DETAIL: &str = "Error reading file.";
const PLAYLIST_FAILED_DETAIL: &str = "Failed to process M3U playlist.";

/// Routes each request either to a built-in [`Command`] or to a file below the
/// base directory.
///
/// Commands are matched first, so a command uri shadows a file with the same name.
pub struct Dispatcher {
    commands: CommandTable,
    resolver: PathResolver,
    playlist_url: String,
    playlist: Arc<dyn PlaylistSource>,
    system: Arc<dyn SystemController>,
}

impl Dispatcher {
    pub fn new(
        resolver: PathResolver,
        playlist_url: impl Into<String>,
        playlist: Arc<dyn PlaylistSource>,
        system: Arc<dyn SystemController>,
    ) -> Self {
        Self { commands: CommandTable::new(), resolver, playlist_url: playlist_url.into(), playlist, system }
    }

    /// Builds a dispatcher with the http playlist source and the command based
    /// system controller described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let resolver = PathResolver::new(&config.server.base_dir)?;
        let playlist = HttpPlaylistSource::from_config(&config.playlist)?;
        let system = CommandSystemController::from(&config.suspend);
        Ok(Self::new(resolver, config.playlist.source_url.clone(), Arc::new(playlist), Arc::new(system)))
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    async fn run_command<W>(&self, command: Command, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        trace!(state = ?ConnectionState::RunningCommand, ?command);
        match command {
            Command::Suspend => self.suspend(writer).await,
            Command::Playlist => self.playlist(writer).await,
        }
    }

    async fn suspend<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        info!("received suspend command");
        let head = ResponseHead::new(StatusCode::OK, HTML_CONTENT_TYPE, SUSPEND_PAGE.len() as u64);
        writer.send_page(head, SUSPEND_PAGE).await?;

        // the confirmation is already out, a failure can only be logged
        if let Err(e) = self.system.suspend().await {
            error!(cause = %e, "suspend failed after the confirmation was sent");
        }
        Ok(())
    }

    async fn playlist<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        info!(url = %self.playlist_url, "received playlist command");
        match self.playlist.fetch_filtered(&self.playlist_url).await {
            Ok(playlist) if !playlist.is_empty() => {
                let head = ResponseHead::ok(PLAYLIST_CONTENT_TYPE, playlist.len() as u64);
                writer.send_page(head, &playlist).await
            }
            Ok(_) => {
                warn!(url = %self.playlist_url, "playlist source returned nothing");
                writer.send_error(StatusCode::INTERNAL_SERVER_ERROR, PLAYLIST_FAILED_DETAIL).await
            }
            Err(e) => {
                warn!(url = %self.playlist_url, cause = %e, "failed to build playlist");
                writer.send_error(StatusCode::INTERNAL_SERVER_ERROR, PLAYLIST_FAILED_DETAIL).await
            }
        }
    }

    async fn serve_file<W>(&self, request: &Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        trace!(state = ?ConnectionState::ServingFile, uri = request.uri());
        let path = match self.resolver.resolve(request.uri()).await {
            ResolvedPath::File(path) => path,
            ResolvedPath::Escaped => {
                warn!(uri = request.uri(), "request escapes the base directory");
                return writer.send_error(StatusCode::FORBIDDEN, FORBIDDEN_DETAIL).await;
            }
        };

        let (file, total_length) = match open_regular_file(&path).await {
            Ok(opened) => opened,
            Err(e) => {
                debug!(path = %path.display(), cause = %e, "file not servable");
                return writer.send_error(StatusCode::NOT_FOUND, NOT_FOUND_DETAIL).await;
            }
        };

        let content_type = path.file_name().and_then(|name| name.to_str()).map_or(OCTET_STREAM, mime_type);

        let Some(range_header) = request.range() else {
            debug!(path = %path.display(), total_length, content_type, "serving whole file");
            return send_file(writer, ResponseHead::ok(content_type, total_length), FileStreamer::new(file, 0, total_length))
                .await;
        };

        match ByteRange::parse(range_header, total_length) {
            Ok(range) => {
                debug!(path = %path.display(), start = range.start(), last = range.last_byte(), total_length, "serving range");
                let head = ResponseHead::partial(content_type, &range);
                send_file(writer, head, FileStreamer::new(file, range.start(), range.len())).await
            }
            Err(RangeError::Malformed { reason }) => {
                debug!(range = range_header, %reason, "malformed range header");
                writer.send_error(StatusCode::BAD_REQUEST, BAD_RANGE_DETAIL).await
            }
            Err(RangeError::Unsatisfiable { complete_length }) => {
                debug!(range = range_header, complete_length, "unsatisfiable range");
                let body = error_page(StatusCode::RANGE_NOT_SATISFIABLE, UNSATISFIABLE_DETAIL);
                let head = ResponseHead::html(StatusCode::RANGE_NOT_SATISFIABLE, body.len() as u64)
                    .with_content_range(ContentRange::Unsatisfied { complete_length });
                writer.send_page(head, &body).await
            }
        }
    }
}

#[async_trait]
impl Handler for Dispatcher {
    async fn call<W>(&self, request: &Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match self.commands.get(request.uri()) {
            Some(command) => self.run_command(command, writer).await,
            None => self.serve_file(request, writer).await,
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("commands", &self.commands)
            .field("resolver", &self.resolver)
            .field("playlist_url", &self.playlist_url)
            .finish_non_exhaustive()
    }
}

/// Sends `head` followed by the streamed window.
///
/// When streaming fails before any byte reached the client, the buffered head is
/// dropped and a 500 is sent in its place; afterwards the error is returned so the
/// connection gets aborted.
async fn send_file<W, F>(writer: &mut ResponseWriter<W>, head: ResponseHead, streamer: FileStreamer<F>) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + Send,
    F: AsyncRead + AsyncSeek + Unpin + Send,
{
    writer.send_head(head).await?;
    let Err(e) = streamer.stream_to(writer).await else {
        return Ok(());
    };

    if writer.discard() {
        error!(cause = %e, "file unreadable before the response was sent");
        return writer.send_error(StatusCode::INTERNAL_SERVER_ERROR, READ_FAILED_DETAIL).await;
    }
    Err(e)
}

/// Opens `path` and snapshots its length; anything but a regular file is refused.
async fn open_regular_file(path: &Path) -> io::Result<(File, u64)> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(io::Error::other("not a regular file"));
    }
    Ok((file, metadata.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlaylistError, SuspendError};
    use crate::playlist::MockPlaylistSource;
    use crate::system::MockSystemController;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        playlist: MockPlaylistSource,
        system: MockSystemController,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("index.html"), "<p>home</p>").unwrap();
            std::fs::write(dir.path().join("data.bin"), (0u8..100).collect::<Vec<_>>()).unwrap();
            std::fs::write(dir.path().join("suspend"), "a file named like a command").unwrap();
            Self { dir, playlist: MockPlaylistSource::new(), system: MockSystemController::new() }
        }

        fn dispatcher(self) -> (Dispatcher, TempDir) {
            let resolver = PathResolver::new(self.dir.path()).unwrap();
            let dispatcher =
                Dispatcher::new(resolver, "http://playlist.test/all.m3u", Arc::new(self.playlist), Arc::new(self.system));
            (dispatcher, self.dir)
        }
    }

    async fn dispatch(dispatcher: &Dispatcher, uri: &str, range: Option<&str>) -> Vec<u8> {
        let headers = range.map(|range| HashMap::from([("Range".to_string(), range.to_string())])).unwrap_or_default();
        let request = Request::new("GET", uri, headers);

        let mut writer = ResponseWriter::new(Vec::new());
        dispatcher.call(&request, &mut writer).await.unwrap();
        writer.into_inner()
    }

    fn split(response: &[u8]) -> (String, Vec<u8>) {
        let at = response.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        (String::from_utf8(response[..at].to_vec()).unwrap(), response[at + 4..].to_vec())
    }

    #[tokio::test]
    async fn serves_whole_file() {
        let (dispatcher, _dir) = Fixture::new().dispatcher();
        let (head, body) = split(&dispatch(&dispatcher, "/data.bin", None).await);

        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: application/octet-stream\r\n"));
        assert!(head.contains("Content-Length: 100\r\n"));
        assert_eq!(body, (0u8..100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn serves_range() {
        let (dispatcher, _dir) = Fixture::new().dispatcher();
        let (head, body) = split(&dispatch(&dispatcher, "/data.bin", Some("bytes=10-19")).await);

        assert!(head.starts_with("HTTP/1.1 206 Partial Content\r\n"));
        assert!(head.contains("Content-Range: bytes 10-19/100\r\n"));
        assert!(head.contains("Content-Length: 10\r\n"));
        assert_eq!(body, (10u8..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn range_errors() {
        let (dispatcher, _dir) = Fixture::new().dispatcher();

        let (head, _) = split(&dispatch(&dispatcher, "/data.bin", Some("bytes=abc-def")).await);
        assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"));

        let (head, body) = split(&dispatch(&dispatcher, "/data.bin", Some("bytes=500-100")).await);
        assert!(head.starts_with("HTTP/1.1 416 Range Not Satisfiable\r\n"));
        assert!(head.contains("Content-Range: bytes */100\r\n"));
        assert_eq!(body, b"<h1>416 Range Not Satisfiable</h1><p>The requested range is not valid.</p>");
    }

    #[tokio::test]
    async fn missing_and_forbidden() {
        let (dispatcher, _dir) = Fixture::new().dispatcher();

        let (head, body) = split(&dispatch(&dispatcher, "/nope.txt", None).await);
        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(body, b"<h1>404 Not Found</h1><p>The requested file was not found.</p>");

        let (head, _) = split(&dispatch(&dispatcher, "/../secret", None).await);
        assert!(head.starts_with("HTTP/1.1 403 Forbidden\r\n"));
    }

    struct FailingRead;

    impl AsyncRead for FailingRead {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<io::Result<()>> {
            std::task::Poll::Ready(Err(io::Error::other("disk read failed")))
        }
    }

    impl AsyncSeek for FailingRead {
        fn start_seek(self: std::pin::Pin<&mut Self>, _position: std::io::SeekFrom) -> io::Result<()> {
            Ok(())
        }

        fn poll_complete(self: std::pin::Pin<&mut Self>, _cx: &mut std::task::Context<'_>) -> std::task::Poll<io::Result<u64>> {
            std::task::Poll::Ready(Ok(0))
        }
    }

    #[tokio::test]
    async fn unreadable_file_becomes_internal_error() {
        let mut writer = ResponseWriter::new(Vec::new());
        let result = send_file(&mut writer, ResponseHead::ok("video/mp4", 10), FileStreamer::new(FailingRead, 0, 10)).await;
        assert!(result.is_ok());

        let (head, body) = split(&writer.into_inner());
        assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(!head.contains("video/mp4"));
        assert_eq!(body, b"<h1>500 Internal Server Error</h1><p>Error reading file.</p>");
    }

    #[tokio::test]
    async fn short_file_after_first_chunk_aborts() {
        let mut writer = ResponseWriter::new(Vec::new());
        let data = std::io::Cursor::new(vec![7u8; 4]);
        let result = send_file(&mut writer, ResponseHead::ok("text/plain", 10), FileStreamer::new(data, 0, 10)).await;

        assert!(matches!(result, Err(SendError::ShortBody { expected: 10, sent: 4 })));
        assert_eq!(String::from_utf8_lossy(&writer.into_inner()).matches("HTTP/1.1").count(), 1);
    }

    #[tokio::test]
    async fn suspend_answers_then_suspends() {
        let mut fixture = Fixture::new();
        fixture.system.expect_suspend().times(1).returning(|| Ok(()));
        let (dispatcher, _dir) = fixture.dispatcher();

        let (head, body) = split(&dispatch(&dispatcher, "/suspend", None).await);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: text/html; charset=UTF-8\r\n"));
        assert_eq!(body, SUSPEND_PAGE.as_bytes());
    }

    #[tokio::test]
    async fn suspend_failure_after_confirmation_is_only_logged() {
        let mut fixture = Fixture::new();
        fixture.system.expect_suspend().times(1).returning(|| Err(SuspendError::NotConfigured));
        let (dispatcher, _dir) = fixture.dispatcher();

        let response = dispatch(&dispatcher, "/suspend", None).await;
        assert_eq!(String::from_utf8_lossy(&response).matches("HTTP/1.1").count(), 1);
    }

    #[tokio::test]
    async fn command_only_on_exact_uri() {
        let mut fixture = Fixture::new();
        fixture.system.expect_suspend().never();
        let (dispatcher, _dir) = fixture.dispatcher();

        let (head, body) = split(&dispatch(&dispatcher, "/suspend?x=1", None).await);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(body, b"a file named like a command");
    }

    #[tokio::test]
    async fn playlist_is_served() {
        let mut fixture = Fixture::new();
        fixture
            .playlist
            .expect_fetch_filtered()
            .times(1)
            .returning(|url| {
                assert_eq!(url, "http://playlist.test/all.m3u");
                Ok("#EXTM3U\n".to_string())
            });
        let (dispatcher, _dir) = fixture.dispatcher();

        let (head, body) = split(&dispatch(&dispatcher, "/channels.m3u", None).await);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: audio/x-mpegurl; charset=UTF-8\r\n"));
        assert_eq!(body, b"#EXTM3U\n");
    }

    #[tokio::test]
    async fn playlist_failure_is_internal_error() {
        let mut fixture = Fixture::new();
        fixture.playlist.expect_fetch_filtered().returning(|_| Err(PlaylistError::NotExtendedM3u));
        let (dispatcher, _dir) = fixture.dispatcher();

        let (head, body) = split(&dispatch(&dispatcher, "/channels.m3u", None).await);
        assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert_eq!(body, b"<h1>500 Internal Server Error</h1><p>Failed to process M3U playlist.</p>");
    }

    #[tokio::test]
    async fn empty_playlist_is_internal_error() {
        let mut fixture = Fixture::new();
        fixture.playlist.expect_fetch_filtered().returning(|_| Ok(String::new()));
        let (dispatcher, _dir) = fixture.dispatcher();

        let (head, _) = split(&dispatch(&dispatcher, "/channels.m3u", None).await);
        assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    }
}
