//! Network Module
//!
//! TCP and UDP servers.
//!
//! ## Architecture
//! - Stream server: non-blocking accept loop, one connection served at a time
//! - Datagram server: one receive loop, one request at a time
//! - Both route decoded requests through the shared `RequestHandler`

mod server;
mod connection;
mod datagram;

pub use server::StreamServer;
pub use connection::Connection;
pub use datagram::DatagramServer;
