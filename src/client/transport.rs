//! Client transports
//!
//! The stream and datagram ends of a client. Both send a whole command and
//! hand back the raw response text; decoding happens in `KvClient`.

use std::io::{BufWriter, ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use bytes::BytesMut;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::protocol::datagram::receive_buffer;
use crate::protocol::{recv_datagram, send_request, take_field, write_request, Command};

/// Bytes requested from the stream per read
const READ_CHUNK_SIZE: usize = 4096;

/// One side of a client connection
pub trait Transport {
    /// Send every field of `command`
    fn send(&mut self, command: &Command) -> Result<()>;

    /// Wait for the next response, up to the configured timeout
    fn recv(&mut self) -> Result<String>;

    /// Release the connection after QUIT was sent
    fn close(&mut self) -> Result<()>;

    /// Address of the server
    fn server_addr(&self) -> SocketAddr;

    /// Whether `err` means this transport can no longer be used
    fn is_session_lost(&self, err: &KvError) -> bool;
}

/// Resolve `host:port` to the first usable socket address
pub fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|e| KvError::Config(format!("Cannot resolve {}: {}", addr, e)))?
        .next()
        .ok_or_else(|| KvError::Config(format!("No address found for {}", addr)))
}

// =============================================================================
// Stream transport
// =============================================================================

/// TCP client end
pub struct StreamTransport {
    reader: TcpStream,
    writer: BufWriter<TcpStream>,
    server_addr: SocketAddr,
    response_timeout: Duration,

    /// Received bytes not yet forming a whole response. Kept across timeouts
    /// so a reply cut mid-frame is completed by the next read.
    pending: BytesMut,

    /// Responses owed by the server, including ones we stopped waiting for.
    /// TCP keeps them in order, so late answers are skipped before ours.
    outstanding: usize,
}

impl StreamTransport {
    /// Connect to `config.server_addr` within the connect timeout
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        let server_addr = resolve(&config.server_addr)?;

        let stream = TcpStream::connect_timeout(&server_addr, config.connect_timeout())
            .map_err(|e| match e.kind() {
                ErrorKind::TimedOut | ErrorKind::WouldBlock => KvError::Timeout,
                _ => KvError::ConnectionRefused(format!("{} ({})", server_addr, e)),
            })?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(config.response_timeout()))?;
        stream.set_write_timeout(Some(config.response_timeout()))?;

        tracing::info!("Connection successful to {}", server_addr);

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(stream),
            server_addr,
            response_timeout: config.response_timeout(),
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
            outstanding: 0,
        })
    }

    /// Read the next whole response frame before `deadline`
    ///
    /// The outer error means no frame was taken off the stream; the inner one
    /// is a frame that was consumed but could not be decoded.
    fn read_frame(&mut self, deadline: Instant) -> Result<Result<String>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(frame) = take_field(&mut self.pending) {
                return Ok(frame);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(KvError::Timeout);
            }
            self.reader.set_read_timeout(Some(remaining))?;

            match self.reader.read(&mut chunk) {
                Ok(0) => return Err(KvError::ConnectionClosed),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(KvError::from_timed_io(e)),
            }
        }
    }
}

impl Transport for StreamTransport {
    fn send(&mut self, command: &Command) -> Result<()> {
        write_request(&mut self.writer, command)
    }

    fn recv(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.response_timeout;

        self.outstanding += 1;
        while self.outstanding > 1 {
            let late = self.read_frame(deadline)?;
            self.outstanding -= 1;
            tracing::debug!("Discarded late response: {:?}", late);
        }

        let raw = self.read_frame(deadline)?;
        self.outstanding -= 1;
        raw
    }

    fn close(&mut self) -> Result<()> {
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Err(e) if e.kind() != ErrorKind::NotConnected => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn is_session_lost(&self, err: &KvError) -> bool {
        matches!(err, KvError::ConnectionClosed | KvError::Io(_))
    }
}

// =============================================================================
// Datagram transport
// =============================================================================

/// UDP client end
pub struct DatagramTransport {
    socket: UdpSocket,
    server_addr: SocketAddr,
    response_timeout: Duration,
    buf: Vec<u8>,
}

impl DatagramTransport {
    /// Bind an ephemeral local socket for talking to `config.server_addr`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let server_addr = resolve(&config.server_addr)?;

        let local: SocketAddr = if server_addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;

        Ok(Self {
            socket,
            server_addr,
            response_timeout: config.response_timeout(),
            buf: receive_buffer(),
        })
    }

    /// Throw away replies that arrived after their request timed out
    fn drain_stale(&mut self) -> Result<()> {
        self.socket.set_nonblocking(true)?;
        let drained = loop {
            match self.socket.recv_from(&mut self.buf) {
                Ok((size, from)) => {
                    tracing::debug!("Discarded stale datagram of {} bytes from {}", size, from);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                // Windows reports ICMP port unreachable for earlier sends here
                Err(e) if e.kind() == ErrorKind::ConnectionReset => {}
                Err(e) => break Err(e),
            }
        };
        self.socket.set_nonblocking(false)?;
        Ok(drained?)
    }
}

impl Transport for DatagramTransport {
    fn send(&mut self, command: &Command) -> Result<()> {
        self.drain_stale()?;
        send_request(&self.socket, command, self.server_addr)
    }

    fn recv(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.response_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(KvError::Timeout);
            }
            self.socket.set_read_timeout(Some(remaining))?;

            let (from, payload) = recv_datagram(&self.socket, &mut self.buf)?;
            if from != self.server_addr {
                tracing::debug!("Ignored datagram from unexpected peer {}", from);
                continue;
            }
            return payload;
        }
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn is_session_lost(&self, _err: &KvError) -> bool {
        false
    }
}
