//! Configuration for DualKV
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use clap::ValueEnum;

use crate::error::{KvError, Result};

/// Which transport a server or client speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Reliable stream (TCP), length-prefixed fields
    Tcp,

    /// Unreliable datagrams (UDP), one field per packet
    Udp,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Tcp => write!(f, "tcp"),
            TransportKind::Udp => write!(f, "udp"),
        }
    }
}

/// Main configuration shared by the server and client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Transport used by both ends
    pub transport: TransportKind,

    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Listen address (host:port)
    pub listen_addr: String,

    /// How often blocking server loops wake up to check for shutdown (milliseconds)
    pub poll_interval_ms: u64,

    /// How long a server waits for the rest of a request once its tag has
    /// arrived: the operand packets over UDP, the remaining fields over TCP
    /// (milliseconds)
    pub operand_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Server address the client talks to (host:port)
    pub server_addr: String,

    /// Connect timeout for the stream client (milliseconds)
    pub connect_timeout_ms: u64,

    /// Time to wait for a response before giving up (milliseconds)
    pub response_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::Tcp,
            listen_addr: "0.0.0.0:5000".to_string(),
            poll_interval_ms: 100,
            operand_timeout_ms: 1000,
            server_addr: "127.0.0.1:5000".to_string(),
            connect_timeout_ms: 1000,
            response_timeout_ms: 1000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every timeout is usable as a socket timeout.
    ///
    /// Sockets reject a zero duration, so zero is refused here instead of
    /// surfacing as an `InvalidInput` I/O error later.
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("operand_timeout_ms", self.operand_timeout_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("response_timeout_ms", self.response_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(KvError::Config(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn operand_timeout(&self) -> Duration {
        Duration::from_millis(self.operand_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the transport
    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.config.transport = transport;
        self
    }

    /// Set the listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the shutdown poll interval (in milliseconds)
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Set how long to wait for the rest of a started request (in milliseconds)
    pub fn operand_timeout_ms(mut self, ms: u64) -> Self {
        self.config.operand_timeout_ms = ms;
        self
    }

    /// Set the server address used by the client
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the response timeout (in milliseconds)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
