use std::net::SocketAddr;
use std::sync::Arc;

use seekserve_http::connection::HttpConnection;
use seekserve_http::protocol::HttpError;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;

/// Accepts connections and answers each one on its own task.
#[derive(Debug)]
pub struct Server {
    config: Arc<Config>,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    /// Creates a server whose dispatcher is built from `config`.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let dispatcher = Dispatcher::from_config(&config)?;
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config: Arc::new(config), dispatcher: Arc::new(dispatcher) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.server.bind_address();
        match TcpListener::bind(address.as_str()).await {
            Ok(listener) => Ok(listener),
            Err(e) => {
                let e = ServerError::bind(address, e);
                if e.is_addr_in_use() {
                    error!(port = self.config.server.port, "port is already in use, stop the other process or pick another port");
                }
                Err(e)
            }
        }
    }

    /// Binds and serves until the process is stopped.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await;
        Ok(())
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) {
        info!(
            app = %self.config.app.name,
            version = %self.config.app.version,
            port = self.config.server.port,
            base_dir = %self.dispatcher.resolver().base_dir().display(),
            "server started"
        );

        let read_timeout = self.config.server.read_timeout();
        loop {
            let (tcp_stream, peer) = match listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer).with_read_timeout(read_timeout);
                log_outcome(peer, connection.process(dispatcher).await);
            });
        }
    }
}

fn log_outcome(peer: SocketAddr, result: Result<(), HttpError>) {
    match result {
        Ok(()) => debug!(%peer, "connection closed"),
        Err(e) if e.is_timeout() => debug!(%peer, "connection closed after read timeout"),
        Err(e @ HttpError::RequestError { .. }) => warn!(%peer, cause = %e, "connection closed on bad request"),
        Err(e @ HttpError::ResponseError { .. }) => error!(%peer, cause = %e, "connection aborted while responding"),
    }
}
