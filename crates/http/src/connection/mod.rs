//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: per-connection driver that:
//!   - Reads one request head under a deadline
//!   - Rejects malformed requests with `400 Bad Request`
//!   - Hands the request to a [`Handler`](crate::handler::Handler)
//!   - Always shuts the connection down afterwards
//!
//! - [`ResponseWriter`]: head-then-body output with framing checks

mod http_connection;
mod response_writer;

pub use http_connection::ConnectionState;
pub use http_connection::DEFAULT_READ_TIMEOUT;
pub use http_connection::HttpConnection;
pub use response_writer::ResponseWriter;
pub use response_writer::error_page;
