//! Datagram codec
//!
//! Encoding and decoding functions for the datagram (UDP) transport.
//!
//! Each field is its own datagram: the raw UTF-8 bytes, no prefix, since the
//! packet boundary already delimits it. A request is sent as one datagram per
//! field in the fixed order tag, key, value. A response is one datagram with
//! the colon-delimited response text.
//!
//! Payloads over `MAX_FIELD_LEN` bytes are rejected in both directions with
//! `PacketTooLarge`. Receive buffers are `MAX_DATAGRAM_SIZE` long so an
//! oversized packet is seen at its real size instead of being truncated.

use std::net::{SocketAddr, UdpSocket};

use bytes::Bytes;

use crate::error::{KvError, Result};
use super::{Command, MAX_FIELD_LEN};

/// Largest payload a UDP datagram can carry over IPv4
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Allocate a receive buffer large enough to see any datagram whole
pub fn receive_buffer() -> Vec<u8> {
    vec![0u8; MAX_DATAGRAM_SIZE]
}

// =============================================================================
// Encoding/Decoding
// =============================================================================

/// Encode one payload, refusing anything over the size limit
pub fn encode_datagram(text: &str) -> Result<Bytes> {
    if text.len() > MAX_FIELD_LEN {
        return Err(KvError::PacketTooLarge { size: text.len() });
    }
    Ok(Bytes::copy_from_slice(text.as_bytes()))
}

/// Decode one received payload
///
/// The size check comes first: an oversized packet is never interpreted.
pub fn decode_datagram(payload: &[u8]) -> Result<String> {
    if payload.len() > MAX_FIELD_LEN {
        return Err(KvError::PacketTooLarge {
            size: payload.len(),
        });
    }
    String::from_utf8(payload.to_vec())
        .map_err(|e| KvError::Protocol(format!("Datagram is not valid UTF-8: {}", e)))
}

// =============================================================================
// Socket helpers
// =============================================================================

/// Send one payload as a single datagram
pub fn send_datagram(socket: &UdpSocket, text: &str, target: SocketAddr) -> Result<()> {
    let bytes = encode_datagram(text)?;
    socket.send_to(&bytes, target)?;
    Ok(())
}

/// Send every field of a command, one datagram each, tag first
///
/// All fields are encoded before the first send so an oversized field never
/// leaves a partial request on the wire.
pub fn send_request(socket: &UdpSocket, command: &Command, target: SocketAddr) -> Result<()> {
    let datagrams = command
        .fields()
        .into_iter()
        .map(encode_datagram)
        .collect::<Result<Vec<_>>>()?;

    for datagram in datagrams {
        socket.send_to(&datagram, target)?;
    }
    Ok(())
}

/// Receive one datagram
///
/// The outer result carries socket failures (including timeouts, mapped to
/// `KvError::Timeout`). The inner result is the decoded payload, kept apart so
/// the caller still learns who sent a packet it had to reject.
pub fn recv_datagram(
    socket: &UdpSocket,
    buf: &mut [u8],
) -> Result<(SocketAddr, Result<String>)> {
    let (size, peer) = socket.recv_from(buf).map_err(KvError::from_timed_io)?;
    Ok((peer, decode_datagram(&buf[..size])))
}
