//! HTTP codec module for encoding and decoding HTTP messages
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Decodes an incoming request head
//!   - Head parsing via the `header` module
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes one outgoing response, head first
//!   - Head encoding via the `header` module
//!   - Length-delimited body framing via the `body` module
//!
//! # Example
//!
//! ```
//! use seekserve_http::codec::{RequestDecoder, ResponseEncoder};
//! use seekserve_http::protocol::{Message, ResponseHead};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer).unwrap();
//! assert!(request.is_some());
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let head: Message<ResponseHead, &[u8]> = Message::Header(ResponseHead::ok("text/plain", 2));
//! encoder.encode(head, &mut response_buffer).unwrap();
//! let body: Message<ResponseHead, &[u8]> = Message::Payload(b"ok");
//! encoder.encode(body, &mut response_buffer).unwrap();
//! assert!(encoder.is_finish());
//! ```

mod body;
mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
