//! The protocol core of seekserve
//!
//! This crate implements the per-connection pipeline of a small HTTP/1.1 static file
//! server built on top of tokio: decoding one request head, validating byte ranges,
//! framing the response and streaming a window of a file as the body.
//!
//! # Features
//!
//! - One request per connection, then close
//! - Read deadline on the request head
//! - Single `Range: bytes=` requests (`N-`, `-N`, `N-M`) with 400/416 distinction
//! - Response framing that refuses a second head or a body longer than announced
//! - Bounded, chunked file streaming
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use seekserve_http::connection::{HttpConnection, ResponseWriter};
//! use seekserve_http::handler::Handler;
//! use seekserve_http::protocol::{Request, ResponseHead, SendError};
//! use tokio::io::AsyncWrite;
//! use tokio::net::TcpListener;
//! use tracing::{error, warn};
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler for HelloWorld {
//!     async fn call<W>(&self, _request: &Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         let body = "Hello World!\r\n";
//!         writer.send_page(ResponseHead::ok("text/plain", body.len() as u64), body).await
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let handler = Arc::new(HelloWorld);
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             if let Err(e) = HttpConnection::new(reader, writer).process(handler).await {
//!                 error!(cause = %e, "connection error");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: connection lifecycle and ordered response output
//! - [`protocol`]: request, byte range, response head and error types
//! - [`codec`]: request decoding and response encoding
//! - [`body`]: response body sources
//! - [`handler`]: the trait applications implement
//!
//! # Limitations
//!
//! - HTTP/1.x only, no TLS
//! - No request bodies, no persistent connections
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64

pub mod body;
pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
