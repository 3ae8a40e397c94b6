//! HTTP head processing module for encoding and decoding
//!
//! # Components
//!
//! - [`HeaderDecoder`]: Decodes a request line and header fields from raw bytes
//!   - Enforces header count and size limits
//!   - Percent-decodes the request target
//!
//! - [`HeaderEncoder`]: Encodes a response head to bytes
//!   - Status line, content headers and `Connection: close`

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
