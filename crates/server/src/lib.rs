//! seekserve: a small static file server
//!
//! Serves files below a base directory over HTTP/1.1, one request per connection,
//! with single byte-range support so media players can seek. Two reserved uris run
//! built-in commands instead of serving a file:
//!
//! - `/suspend` answers with a confirmation page and then puts the host to sleep
//! - `/channels.m3u` fetches a remote extended m3u playlist and serves only the
//!   entries of the configured groups
//!
//! The protocol work (request decoding, ranges, response framing, streaming) lives
//! in `seekserve-http`; this crate adds configuration, path resolution, the command
//! table and the accept loop.
//!
//! # Example
//!
//! ```no_run
//! use seekserve::config::Config;
//! use seekserve::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), seekserve::error::ServerError> {
//!     let config = Config::load(None)?;
//!     Server::new(config)?.run().await
//! }
//! ```

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mime;
pub mod playlist;
pub mod resolver;
pub mod server;
pub mod system;
