//! Response body sources.
//!
//! - [`FileStreamer`]: copies a bounded window of a seekable file to a
//!   [`ResponseWriter`](crate::connection::ResponseWriter)

mod file_streamer;

pub use file_streamer::CHUNK_SIZE;
pub use file_streamer::FileStreamer;
