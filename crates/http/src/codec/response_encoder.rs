use crate::codec::body::LengthEncoder;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{Message, ResponseHead, SendError};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

/// Encodes exactly one response: a head, then the body bytes it promised.
///
/// The encoder enforces the framing order. A second head, a body chunk before the
/// head, or more body bytes than `Content-Length` are all rejected without writing
/// anything to the destination buffer.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    AwaitingHead,
    Body(LengthEncoder),
    Complete,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the head has been encoded.
    #[inline]
    pub fn head_sent(&self) -> bool {
        !matches!(self.state, State::AwaitingHead)
    }

    /// Body bytes promised by the head that have not been encoded yet.
    pub fn body_remaining(&self) -> u64 {
        match &self.state {
            State::Body(encoder) => encoder.remaining(),
            State::AwaitingHead | State::Complete => 0,
        }
    }

    /// Returns true when the head and its whole body have been encoded.
    #[inline]
    pub fn is_finish(&self) -> bool {
        matches!(self.state, State::Complete)
    }
}

impl<D: Buf> Encoder<Message<ResponseHead, D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message<ResponseHead, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header(head) => {
                if self.head_sent() {
                    error!(status = %head.status(), "response head already sent");
                    return Err(SendError::HeadAlreadySent);
                }

                let content_length = head.content_length();
                self.header_encoder.encode(head, dst)?;
                self.state = if content_length == 0 {
                    State::Complete
                } else {
                    State::Body(LengthEncoder::new(content_length))
                };
                Ok(())
            }

            Message::Payload(bytes) => match &mut self.state {
                State::AwaitingHead => {
                    error!("expect response head but receive payload");
                    Err(SendError::BodyBeforeHead)
                }
                State::Body(encoder) => {
                    encoder.encode(bytes, dst)?;
                    if encoder.is_finish() {
                        self.state = State::Complete;
                    }
                    Ok(())
                }
                State::Complete if !bytes.has_remaining() => Ok(()),
                State::Complete => Err(SendError::body_overflow(0, bytes.remaining() as u64)),
            },
        }
    }
}
