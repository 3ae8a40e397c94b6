use crate::protocol::SendError;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

/// Encodes a `Content-Length` delimited body, tracking how many bytes are still owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    remaining: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }

    /// Bytes the head promised that have not been encoded yet.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[inline]
    pub fn is_finish(&self) -> bool {
        self.remaining == 0
    }
}

impl<D: Buf> Encoder<D> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, bytes: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if !bytes.has_remaining() {
            return Ok(());
        }

        let received = bytes.remaining() as u64;
        if received > self.remaining {
            warn!(remaining = self.remaining, received, "body chunk exceeds the declared content length");
            return Err(SendError::body_overflow(self.remaining, received));
        }

        dst.put(bytes);
        self.remaining -= received;
        Ok(())
    }
}
