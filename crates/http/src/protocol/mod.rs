//! Core HTTP protocol types.
//!
//! # Architecture
//!
//! - **Message Handling** ([`message`]): head-then-body framing
//!   - [`Message`]: either a head or a body chunk
//!
//! - **Request** ([`request`]): the decoded request head
//!   - [`Request`]: method, decoded uri and headers
//!
//! - **Byte ranges** ([`range`]): the `Range` request header
//!   - [`ByteRange`]: a validated window over a resource
//!   - [`RangeEnd`]: closed or open-ended
//!
//! - **Response** ([`response`]): the response head
//!   - [`ResponseHead`]: status, content type, content length and content range
//!   - [`ContentRange`]: value of the `Content-Range` header
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response sending errors
//!   - [`RangeError`]: Malformed or unsatisfiable ranges

mod message;
pub use message::Message;

mod request;
pub use request::RANGE;
pub use request::Request;

mod range;
pub use range::ByteRange;
pub use range::RangeEnd;

mod response;
pub use response::ContentRange;
pub use response::HTML_CONTENT_TYPE;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::RangeError;
pub use error::SendError;
