use bytes::{Buf, Bytes};

/// An item written to the wire for one HTTP response.
///
/// The generic parameter `T` is the head type while `Data` is the body chunk type.
/// A message is always one `Header` followed by zero or more `Payload` chunks.
#[derive(Debug)]
pub enum Message<T, Data: Buf = Bytes> {
    /// Contains the head of the message
    Header(T),
    /// Contains a chunk of body data
    Payload(Data),
}
