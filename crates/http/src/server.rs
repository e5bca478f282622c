use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::connection::{ConnectionConfig, HttpConnection};
use crate::handler::Handler;

#[derive(Debug)]
pub struct ServerBuilder<H> {
    address: Option<String>,
    handler: Option<H>,
    config: ConnectionConfig,
}

impl<H> ServerBuilder<H> {
    fn new() -> Self {
        Self { address: None, handler: None, config: ConnectionConfig::default() }
    }

    /// Address to listen on, such as `127.0.0.1:42069`. Port `0` picks a free port.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Server<H>, ServerError> {
        let address = self.address.ok_or(ServerError::MissingAddress)?;
        let handler = self.handler.ok_or(ServerError::MissingHandler)?;
        Ok(Server { address, handler: Arc::new(handler), config: self.config })
    }
}

/// Accepts TCP connections and serves one request per connection with a [`Handler`].
#[derive(Debug)]
pub struct Server<H> {
    address: String,
    handler: Arc<H>,
    config: ConnectionConfig,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("address must be set")]
    MissingAddress,
    #[error("handler must be set")]
    MissingHandler,
    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },
}

impl<H> Server<H>
where
    H: Handler<OwnedWriteHalf> + Send + Sync + 'static,
{
    pub fn builder() -> ServerBuilder<H> {
        ServerBuilder::new()
    }

    /// Binds the listener and spawns the accept loop.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address can't be bound.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let tcp_listener = match TcpListener::bind(self.address.as_str()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, address = %self.address, "bind server error");
                return Err(ServerError::Bind { address: self.address, source: e });
            }
        };

        let local_addr = tcp_listener
            .local_addr()
            .map_err(|e| ServerError::Bind { address: self.address.clone(), source: e })?;
        info!(%local_addr, "start listening");

        let token = CancellationToken::new();
        let task = tokio::spawn(accept_loop(tcp_listener, self.handler, self.config, token.clone()));

        Ok(ServerHandle { local_addr, token, task })
    }
}

async fn accept_loop<H>(tcp_listener: TcpListener, handler: Arc<H>, config: ConnectionConfig, token: CancellationToken)
where
    H: Handler<OwnedWriteHalf> + Send + Sync + 'static,
{
    loop {
        let accepted = tokio::select! {
            () = token.cancelled() => break,
            accepted = tcp_listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, &config);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                }
            }
        });
    }

    info!("server stopped accepting connections");
}

/// A running server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// Connections already accepted run to completion on their own.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            error!(cause = %e, "accept loop ended abnormally");
        }
    }
}
