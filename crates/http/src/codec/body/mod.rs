//! Response body framing.
//!
//! Every body this server sends has a length known up front, so the only encoder
//! is [`LengthEncoder`], which refuses to emit more bytes than the head promised.

mod length_encoder;

pub use length_encoder::LengthEncoder;
