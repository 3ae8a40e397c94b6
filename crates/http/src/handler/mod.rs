use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::{Request, SendError};

/// Produces the response for one decoded request.
///
/// Implementations write through the [`ResponseWriter`] themselves, so they can stream
/// bodies of any size. Application failures must be turned into responses inside the
/// handler; the only error that escapes is a [`SendError`], which means the response
/// could not be delivered and the connection has to be dropped.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call<W>(&self, request: &Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send;
}
