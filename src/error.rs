//! Error types for DualKV
//!
//! Provides a unified error type for the codec, the servers and the client.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for DualKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Packet size too big: {size} bytes (max 1024)")]
    PacketTooLarge { size: usize },

    #[error("Connection closed by peer")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Local Validation Errors
    // -------------------------------------------------------------------------
    #[error("Wrong format of command.")]
    InvalidFormat,

    #[error("Key length is too big: {size} bytes (max 1024)")]
    KeyTooLarge { size: usize },

    #[error("Val length is too big: {size} bytes (max 1024)")]
    ValueTooLarge { size: usize },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Connection to {0} failed. Make sure the address is correct and the server is running")]
    ConnectionRefused(String),

    #[error("Server taking too long to respond. Try again!")]
    Timeout,

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Map an I/O error raised while waiting on a socket with a read timeout.
    ///
    /// Unix reports an expired timeout as `WouldBlock`, Windows as `TimedOut`.
    pub fn from_timed_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => KvError::Timeout,
            std::io::ErrorKind::UnexpectedEof => KvError::ConnectionClosed,
            _ => KvError::Io(err),
        }
    }

    /// True when the error is a timeout the caller may retry by hand
    pub fn is_timeout(&self) -> bool {
        matches!(self, KvError::Timeout)
    }
}
