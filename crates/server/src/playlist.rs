//! Remote playlist fetching and group filtering.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use tracing::{debug, warn};

use crate::config::PlaylistConfig;
use crate::error::PlaylistError;

/// Bound on both connecting to and reading from the playlist source.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const EXTENDED_M3U_HEADER: &str = "#EXTM3U";
const ENTRY_INFO: &str = "#EXTINF";

/// Supplies the body of the `/channels.m3u` command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetches the playlist at `url` and keeps only the configured groups.
    async fn fetch_filtered(&self, url: &str) -> Result<String, PlaylistError>;
}

/// Fetches playlists over http(s) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPlaylistSource {
    client: reqwest::Client,
    groups: Vec<String>,
}

impl HttpPlaylistSource {
    pub fn new(groups: Vec<String>) -> Result<Self, PlaylistError> {
        let client = reqwest::Client::builder().connect_timeout(FETCH_TIMEOUT).timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client, groups })
    }

    pub fn from_config(config: &PlaylistConfig) -> Result<Self, PlaylistError> {
        Self::new(config.groups.clone())
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistSource {
    async fn fetch_filtered(&self, url: &str) -> Result<String, PlaylistError> {
        if url.is_empty() {
            return Err(PlaylistError::MissingUrl);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(url, %status, "playlist source refused the request");
            return Err(PlaylistError::Status { status });
        }

        let text = response.text().await?;
        debug!(url, received = text.len(), "fetched playlist");
        filter_playlist(&text, &self.groups)
    }
}

/// Keeps the `#EXTM3U` header and every entry whose `#EXTINF` line names one of
/// `groups` in its `group-title` attribute.
///
/// The line right after a kept `#EXTINF` line is kept as its stream location. Every
/// output line ends in `\n`.
///
/// ```
/// use seekserve::playlist::filter_playlist;
///
/// let source = "#EXTM3U\n#EXTINF:-1 group-title=\"NFL\",Game\nhttp://a/1\n#EXTINF:-1 group-title=\"News\",N\nhttp://a/2\n";
/// let filtered = filter_playlist(source, &["NFL".to_string()]).unwrap();
/// assert_eq!(filtered, "#EXTM3U\n#EXTINF:-1 group-title=\"NFL\",Game\nhttp://a/1\n");
/// ```
pub fn filter_playlist(text: &str, groups: &[String]) -> Result<String, PlaylistError> {
    let mut lines = text.strip_prefix('\u{feff}').unwrap_or(text).lines();

    let header = match lines.next() {
        Some(line) if line.trim().starts_with(EXTENDED_M3U_HEADER) => line,
        _ => return Err(PlaylistError::NotExtendedM3u),
    };

    let titles: Vec<String> = groups.iter().map(|group| format!("group-title=\"{group}\"")).collect();

    let mut filtered = String::with_capacity(text.len() / 4);
    filtered.push_str(header);
    filtered.push('\n');

    let mut keep_next = false;
    for line in lines {
        if line.starts_with(ENTRY_INFO) {
            keep_next = titles.iter().any(|title| line.contains(title.as_str()));
            if keep_next {
                filtered.push_str(line);
                filtered.push('\n');
            }
        } else if keep_next {
            filtered.push_str(line);
            filtered.push('\n');
            keep_next = false;
        }
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn default_groups() -> Vec<String> {
        vec!["NFL".to_string(), "MLB".to_string()]
    }

    const PLAYLIST: &str = indoc! {r#"
        #EXTM3U x-tvg-url="http://guide"
        #EXTINF:-1 tvg-id="a" group-title="NFL",Sunday Game
        http://streams/nfl/1.m3u8
        #EXTINF:-1 tvg-id="b" group-title="NBA",Hoops
        http://streams/nba/1.m3u8
        #EXTINF:-1 tvg-id="c" group-title="MLB",Ballgame
        http://streams/mlb/1.m3u8
        #EXTINF:-1 tvg-id="d" group-title="NFL Classics",Old Game
        http://streams/classics/1.m3u8
    "#};

    #[test]
    fn keeps_configured_groups() {
        let filtered = filter_playlist(PLAYLIST, &default_groups()).unwrap();

        let expected = indoc! {r#"
            #EXTM3U x-tvg-url="http://guide"
            #EXTINF:-1 tvg-id="a" group-title="NFL",Sunday Game
            http://streams/nfl/1.m3u8
            #EXTINF:-1 tvg-id="c" group-title="MLB",Ballgame
            http://streams/mlb/1.m3u8
        "#};
        assert_eq!(filtered, expected);
    }

    #[test]
    fn crlf_input_gives_lf_output() {
        let source = "#EXTM3U\r\n#EXTINF:-1 group-title=\"MLB\",G\r\nhttp://x/1\r\n";
        let filtered = filter_playlist(source, &default_groups()).unwrap();
        assert_eq!(filtered, "#EXTM3U\n#EXTINF:-1 group-title=\"MLB\",G\nhttp://x/1\n");
    }

    #[test]
    fn header_alone_when_nothing_matches() {
        let filtered = filter_playlist(PLAYLIST, &["NHL".to_string()]).unwrap();
        assert_eq!(filtered, "#EXTM3U x-tvg-url=\"http://guide\"\n");
    }

    #[test]
    fn rejects_plain_m3u() {
        let result = filter_playlist("http://streams/1.m3u8\n", &default_groups());
        assert!(matches!(result, Err(PlaylistError::NotExtendedM3u)));

        let result = filter_playlist("", &default_groups());
        assert!(matches!(result, Err(PlaylistError::NotExtendedM3u)));
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let source = HttpPlaylistSource::new(default_groups()).unwrap();
        assert!(matches!(source.fetch_filtered("").await, Err(PlaylistError::MissingUrl)));
    }

    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = stream.read(&mut request).await.unwrap();
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{address}/playlist.m3u")
    }

    #[tokio::test]
    async fn fetches_and_filters() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: audio/x-mpegurl\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{PLAYLIST}",
            PLAYLIST.len()
        );
        let url = serve_once(response).await;

        let source = HttpPlaylistSource::new(default_groups()).unwrap();
        let filtered = source.fetch_filtered(&url).await.unwrap();

        assert!(filtered.starts_with("#EXTM3U"));
        assert!(filtered.contains("http://streams/nfl/1.m3u8\n"));
        assert!(!filtered.contains("nba"));
    }

    #[tokio::test]
    async fn non_ok_status_is_an_error() {
        let response = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let url = serve_once(response).await;

        let source = HttpPlaylistSource::new(default_groups()).unwrap();
        let result = source.fetch_filtered(&url).await;

        assert!(matches!(result, Err(PlaylistError::Status { status }) if status == StatusCode::NOT_FOUND));
    }
}
