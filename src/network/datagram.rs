//! UDP Server
//!
//! A single receive loop that processes requests one at a time.
//!
//! A request arrives as one datagram per field. The tag datagram starts a
//! request; its operands must then come from the same peer within
//! `operand_timeout`. There is no session: QUIT is only logged.

use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::handler::{Outcome, RequestHandler};
use crate::protocol::datagram::receive_buffer;
use crate::protocol::{
    message, recv_datagram, send_datagram, Command, CommandType, Request, Response, MAX_FIELD_LEN,
};
use crate::shutdown::CancellationToken;
use crate::store::Store;

/// Datagram (UDP) server for DualKV
pub struct DatagramServer {
    config: Config,
    handler: RequestHandler,
    socket: UdpSocket,
    shutdown: CancellationToken,
    buf: Vec<u8>,
}

impl DatagramServer {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let socket = UdpSocket::bind(&config.listen_addr)?;
        socket.set_read_timeout(Some(config.poll_interval()))?;

        Ok(Self {
            config,
            handler: RequestHandler::new(store),
            socket,
            shutdown: CancellationToken::new(),
            buf: receive_buffer(),
        })
    }

    /// Use an externally owned cancellation token (e.g. one tied to Ctrl+C)
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The bound address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// A handle that stops `run` when cancelled
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Start the receive loop (blocking until shutdown)
    pub fn run(&mut self) -> Result<()> {
        let addr = self.local_addr()?;
        tracing::info!("Server started. Listening for clients on {} (udp)...", addr);

        while !self.shutdown.is_cancelled() {
            let (peer, tag) = match recv_datagram(&self.socket, &mut self.buf) {
                Ok(received) => received,
                Err(KvError::Timeout) => continue,
                Err(e) => {
                    // e.g. ICMP port unreachable from an earlier reply, reported on Windows
                    tracing::warn!("Error receiving datagram: {}", e);
                    continue;
                }
            };

            let tag = match tag {
                Ok(tag) => tag,
                Err(e) => {
                    tracing::warn!(%peer, "Dropped request: {}", e);
                    continue;
                }
            };

            let request = match CommandType::from_tag(&tag) {
                Some(kind) => match self.recv_operands(kind, peer) {
                    Ok(operands) => Request::Command(Command::from_parts(kind, operands)),
                    Err(e) => {
                        tracing::warn!(%peer, "Abandoned {} request: {}", kind.as_str(), e);
                        continue;
                    }
                },
                None => Request::Invalid(tag),
            };

            match self.handler.handle(request, peer) {
                Outcome::Reply(response) => self.reply(response, peer),
                Outcome::Quit => tracing::info!(%peer, "Connection closed"),
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Receive the operand datagrams that follow a tag from `peer`
    ///
    /// Datagrams from other peers arriving meanwhile are dropped. Any
    /// oversized or undecodable operand abandons the whole request.
    fn recv_operands(&mut self, kind: CommandType, peer: SocketAddr) -> Result<Vec<String>> {
        let deadline = Instant::now() + self.config.operand_timeout();
        let mut operands = Vec::with_capacity(kind.arity());

        let result = loop {
            if operands.len() == kind.arity() {
                break Ok(());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break Err(KvError::Timeout);
            }
            if let Err(e) = self.socket.set_read_timeout(Some(remaining)) {
                break Err(e.into());
            }

            match recv_datagram(&self.socket, &mut self.buf) {
                Ok((from, _)) if from != peer => {
                    tracing::warn!(peer = %from, "Dropped datagram while awaiting operands from {}", peer);
                }
                Ok((_, Ok(operand))) => operands.push(operand),
                Ok((_, Err(e))) | Err(e) => break Err(e),
            }
        };

        self.socket.set_read_timeout(Some(self.config.poll_interval()))?;
        result.map(|()| operands)
    }

    /// Send a response datagram, shortening its message to fit if needed
    fn reply(&self, response: Response, peer: SocketAddr) {
        let response = response.fit_within(MAX_FIELD_LEN).unwrap_or_else(|| {
            let size = response.encode().len();
            tracing::warn!(%peer, "Response of {} bytes does not fit in a datagram", size);
            Response::failure(message::response_too_large(size))
        });

        if let Err(e) = send_datagram(&self.socket, &response.encode(), peer) {
            tracing::error!(%peer, "Error sending response: {}", e);
        }
    }
}
