//! Client Module
//!
//! Builds requests from user input, sends them over TCP or UDP and interprets
//! the responses.
//!
//! ## Error taxonomy
//! - Local validation (`InvalidFormat`, `KeyTooLarge`, `ValueTooLarge`):
//!   rejected before any I/O, user re-prompted
//! - `ConnectionRefused`: fatal for the TCP client
//! - `Timeout`: reported, the request is abandoned and never retried
//! - `PacketTooLarge`: an oversized reply datagram is rejected
//! - A `Failure` response (miss, unknown command) is not an error at all

mod kv_client;
mod input;
mod transport;
pub mod repl;

pub use kv_client::KvClient;
pub use input::{parse_line, validate, USAGE};
pub use transport::{resolve, DatagramTransport, StreamTransport, Transport};
