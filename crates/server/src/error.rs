use std::io;

use thiserror::Error;

/// Errors that stop the server from starting or keep it from accepting.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid configuration: {source}")]
    Config {
        #[from]
        source: config::ConfigError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("playlist source unavailable: {source}")]
    Playlist {
        #[from]
        source: PlaylistError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ServerError {
    pub fn bind(address: impl Into<String>, source: io::Error) -> Self {
        Self::Bind { address: address.into(), source }
    }

    /// Returns true when binding failed because another process holds the port.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, Self::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }
}

/// Errors raised while fetching or filtering the remote playlist.
#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("no playlist source url configured")]
    MissingUrl,

    #[error("playlist request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    #[error("playlist source answered with status {status}")]
    Status { status: http::StatusCode },

    #[error("playlist is not an extended m3u file")]
    NotExtendedM3u,
}

/// Errors raised while asking the host to suspend.
#[derive(Error, Debug)]
pub enum SuspendError {
    #[error("no suspend program configured")]
    NotConfigured,

    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
}

impl SuspendError {
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn { program: program.into(), source }
    }
}
