//! Connection Handler
//!
//! Serves the command stream of a single TCP client.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::handler::{Outcome, RequestHandler};
use crate::protocol::{read_request, write_response, Response};
use crate::shutdown::CancellationToken;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Executes decoded requests against the store
    handler: RequestHandler,

    /// Peer address for logging
    peer_addr: SocketAddr,

    /// Read timeout while idle between requests
    poll_interval: Duration,

    /// Read timeout once a request has started arriving
    request_timeout: Duration,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn new(
        stream: TcpStream,
        handler: RequestHandler,
        poll_interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let peer_addr = stream.peer_addr()?;

        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(poll_interval))?;
        stream.set_write_timeout(Some(request_timeout))?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            handler,
            peer_addr,
            poll_interval,
            request_timeout,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends responses. Returns when the client
    /// sends QUIT, disconnects, or `shutdown` is cancelled while idle.
    pub fn handle(&mut self, shutdown: &CancellationToken) -> Result<()> {
        tracing::info!(peer = %self.peer_addr, "Client connection successful");

        loop {
            if !self.wait_for_request(shutdown)? {
                return Ok(());
            }

            self.reader.get_ref().set_read_timeout(Some(self.request_timeout))?;
            let read = read_request(&mut self.reader);
            self.reader.get_ref().set_read_timeout(Some(self.poll_interval))?;

            let request = match read {
                Ok(request) => request,
                Err(KvError::ConnectionClosed) => {
                    tracing::info!(peer = %self.peer_addr, "Client disconnected");
                    return Ok(());
                }
                Err(KvError::Protocol(detail)) => {
                    // The whole request was consumed, so the stream is still aligned
                    tracing::warn!(peer = %self.peer_addr, "Malformed request: {}", detail);
                    let response = Response::failure(format!("Malformed request: {}", detail));
                    if !self.send_response(response)? {
                        return Ok(());
                    }
                    continue;
                }
                Err(KvError::Timeout) => {
                    tracing::warn!(peer = %self.peer_addr, "Request arrived incomplete, closing connection");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(peer = %self.peer_addr, "Error reading request: {}", e);
                    return Err(e);
                }
            };

            tracing::trace!(peer = %self.peer_addr, "Received request: {:?}", request);

            match self.handler.handle(request, self.peer_addr) {
                Outcome::Reply(response) => {
                    if !self.send_response(response)? {
                        return Ok(());
                    }
                }
                Outcome::Quit => {
                    tracing::info!(peer = %self.peer_addr, "Connection closed");
                    return Ok(());
                }
            }
        }
    }

    /// Block until request bytes are buffered
    ///
    /// Returns `false` if the peer closed the stream or shutdown was requested.
    fn wait_for_request(&mut self, shutdown: &CancellationToken) -> Result<bool> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) if buf.is_empty() => {
                    tracing::info!(peer = %self.peer_addr, "Client disconnected");
                    return Ok(false);
                }
                Ok(_) => return Ok(true),
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if shutdown.is_cancelled() {
                        tracing::info!(peer = %self.peer_addr, "Server shutting down, closing connection");
                        return Ok(false);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if is_disconnect(e.kind()) => {
                    tracing::info!(peer = %self.peer_addr, "Connection reset by client");
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Send a response to the client
    ///
    /// Returns `false` if the client left before the response could be sent.
    fn send_response(&mut self, response: Response) -> Result<bool> {
        match write_response(&mut self.writer, &response) {
            Ok(()) => Ok(true),
            Err(KvError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::info!(
                    peer = %self.peer_addr,
                    "Client disconnected before response could be sent: {}", e
                );
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(peer = %self.peer_addr, "Error writing response: {}", e);
                Err(e)
            }
        }
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe
    )
}
