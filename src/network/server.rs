//! TCP Server
//!
//! Accepts connections and serves them one at a time.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::error::Result;
use crate::handler::RequestHandler;
use crate::shutdown::CancellationToken;
use crate::store::Store;
use super::Connection;

/// Stream (TCP) server for DualKV
///
/// A connection's whole command stream is served before the next connection
/// is accepted; clients arriving meanwhile wait in the listen backlog.
pub struct StreamServer {
    config: Config,
    handler: RequestHandler,
    listener: TcpListener,
    shutdown: CancellationToken,
}

impl StreamServer {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can notice shutdown
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            handler: RequestHandler::new(store),
            listener,
            shutdown: CancellationToken::new(),
        })
    }

    /// Use an externally owned cancellation token (e.g. one tied to Ctrl+C)
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The bound address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that stops `run` when cancelled
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        let addr = self.local_addr()?;
        tracing::info!("Server started. Listening for clients on {} (tcp)...", addr);

        while !self.shutdown.is_cancelled() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    let served = Connection::new(
                        stream,
                        self.handler.clone(),
                        self.config.poll_interval(),
                        self.config.operand_timeout(),
                    )
                    .and_then(|mut connection| connection.handle(&self.shutdown));

                    if let Err(e) = served {
                        tracing::error!(%peer, "Error serving client: {}", e);
                    }
                    if !self.shutdown.is_cancelled() {
                        tracing::info!("Listening for clients on {} (tcp)...", addr);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(self.config.poll_interval());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::error!("Connection not successful: {}", e);
                    thread::sleep(self.config.poll_interval());
                }
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
