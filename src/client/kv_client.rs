//! Client Request Builder/Parser
//!
//! Validates commands, sends them over a transport and decodes the replies.

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::protocol::{Command, Response};
use super::input::validate;
use super::transport::{DatagramTransport, StreamTransport, Transport};

/// Key-value client over any transport
pub struct KvClient<T: Transport> {
    transport: T,
}

impl KvClient<StreamTransport> {
    /// Connect a TCP client to `config.server_addr`
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(StreamTransport::connect(config)?))
    }
}

impl KvClient<DatagramTransport> {
    /// Open a UDP client for `config.server_addr`
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(DatagramTransport::open(config)?))
    }
}

impl<T: Transport> KvClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the value of `key`
    ///
    /// A miss is a `Failure` response, not an error.
    pub fn get(&mut self, key: impl Into<String>) -> Result<Response> {
        self.request(&Command::Get { key: key.into() })
    }

    /// Set `key` to `value`, overwriting any previous value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Response> {
        self.request(&Command::Put {
            key: key.into(),
            value: value.into(),
        })
    }

    /// Remove `key`
    pub fn delete(&mut self, key: impl Into<String>) -> Result<Response> {
        self.request(&Command::Delete { key: key.into() })
    }

    /// End the session: send QUIT and close the transport. No reply is expected.
    pub fn quit(&mut self) -> Result<()> {
        self.transport.send(&Command::Quit)?;
        self.transport.close()
    }

    /// Run any command. Returns `None` for QUIT.
    pub fn execute(&mut self, command: &Command) -> Result<Option<Response>> {
        match command {
            Command::Quit => self.quit().map(|()| None),
            _ => self.request(command).map(Some),
        }
    }

    /// Whether `err` ended the session
    pub fn is_session_lost(&self, err: &KvError) -> bool {
        self.transport.is_session_lost(err)
    }

    /// Validate, send, wait for and decode one response
    fn request(&mut self, command: &Command) -> Result<Response> {
        validate(command)?;

        self.transport.send(command)?;
        let raw = self.transport.recv()?;
        tracing::debug!("Response from {}: {}", self.transport.server_addr(), raw);

        match command {
            Command::Get { key } => Response::decode_get(&raw, key),
            _ => Response::decode(&raw),
        }
    }
}
