//! Stream codec
//!
//! Encoding and decoding functions for the stream (TCP) transport.
//!
//! ## Wire Format
//!
//! Every field is a length-prefixed UTF-8 string:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │      UTF-8 bytes            │
//! └──────────┴─────────────────────────────┘
//! ```
//! The length is big-endian, the same framing `DataOutputStream.writeUTF`
//! produces for text without NUL or supplementary characters.
//!
//! ### Request
//! The tag field followed by its operands:
//! - GET:    "GET", key
//! - PUT:    "PUT", key, value
//! - DELETE: "DELETE", key
//! - QUIT:   "QUIT"
//!
//! ### Response
//! One field holding the colon-delimited response text.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{KvError, Result};
use super::{Command, CommandType, Request, Response};

/// Length prefix size: 2 bytes, big-endian
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest field the 2-byte prefix can describe
pub const MAX_STREAM_FIELD_LEN: usize = u16::MAX as usize;

// =============================================================================
// Field Encoding/Decoding
// =============================================================================

/// Encode one field
///
/// Format: len (2) + utf-8 bytes
pub fn encode_field(field: &str) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + field.len());
    put_field(&mut buf, field)?;
    Ok(buf.freeze())
}

/// Decode one field from the front of `bytes`
///
/// Returns the field and the number of bytes consumed
pub fn decode_field(bytes: &[u8]) -> Result<(String, usize)> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(KvError::Protocol(format!(
            "Incomplete length prefix: expected {} bytes, got {}",
            LENGTH_PREFIX_SIZE,
            bytes.len()
        )));
    }

    let field_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let total_len = LENGTH_PREFIX_SIZE + field_len;
    if bytes.len() < total_len {
        return Err(KvError::Protocol(format!(
            "Incomplete field: expected {} bytes, got {}",
            field_len,
            bytes.len() - LENGTH_PREFIX_SIZE
        )));
    }

    let field = utf8(bytes[LENGTH_PREFIX_SIZE..total_len].to_vec())?;
    Ok((field, total_len))
}

/// Split one complete field off the front of `buf`
///
/// Returns `None` while the field is incomplete, leaving `buf` untouched so
/// more bytes can be appended. A complete field is removed from `buf` even
/// when it is not valid UTF-8.
pub fn take_field(buf: &mut BytesMut) -> Option<Result<String>> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return None;
    }

    let field_len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    if buf.len() < LENGTH_PREFIX_SIZE + field_len {
        return None;
    }

    buf.advance(LENGTH_PREFIX_SIZE);
    let field = buf.split_to(field_len);
    Some(utf8(field.to_vec()))
}

fn put_field(buf: &mut BytesMut, field: &str) -> Result<()> {
    if field.len() > MAX_STREAM_FIELD_LEN {
        return Err(KvError::Protocol(format!(
            "Field too long to encode: {} bytes (max {})",
            field.len(),
            MAX_STREAM_FIELD_LEN
        )));
    }
    buf.put_u16(field.len() as u16);
    buf.put_slice(field.as_bytes());
    Ok(())
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| KvError::Protocol(format!("Field is not valid UTF-8: {}", e)))
}

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode every field of a command back to back
pub fn encode_request(command: &Command) -> Result<Bytes> {
    let fields = command.fields();
    let capacity = fields.iter().map(|f| LENGTH_PREFIX_SIZE + f.len()).sum();

    let mut buf = BytesMut::with_capacity(capacity);
    for field in fields {
        put_field(&mut buf, field)?;
    }
    Ok(buf.freeze())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read the raw bytes of one field
///
/// Blocks until the whole field is received or an error occurs
fn read_field_bytes<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix).map_err(KvError::from_timed_io)?;

    let field_len = u16::from_be_bytes(prefix) as usize;
    let mut field = vec![0u8; field_len];
    if field_len > 0 {
        reader.read_exact(&mut field).map_err(KvError::from_timed_io)?;
    }
    Ok(field)
}

/// Read one field
pub fn read_field<R: Read>(reader: &mut R) -> Result<String> {
    utf8(read_field_bytes(reader)?)
}

/// Write one field (no flush)
pub fn write_field<W: Write>(writer: &mut W, field: &str) -> Result<()> {
    let bytes = encode_field(field)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Write all fields of a command, then flush once
pub fn write_request<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_request(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete request from a stream
///
/// The tag is read first; a recognised tag is followed by exactly its operand
/// fields. An unknown tag becomes `Request::Invalid` without reading further,
/// since its arity is unknown. Every operand is consumed before UTF-8 is
/// checked, so a malformed operand leaves the stream aligned on the next
/// request.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let tag = read_field_bytes(reader)?;
    let tag = match String::from_utf8(tag) {
        Ok(tag) => tag,
        Err(e) => {
            return Ok(Request::Invalid(
                String::from_utf8_lossy(e.as_bytes()).into_owned(),
            ))
        }
    };

    let kind = match CommandType::from_tag(&tag) {
        Some(kind) => kind,
        None => return Ok(Request::Invalid(tag)),
    };

    let raw_operands = (0..kind.arity())
        .map(|_| read_field_bytes(reader))
        .collect::<Result<Vec<_>>>()?;
    let operands = raw_operands
        .into_iter()
        .map(utf8)
        .collect::<Result<Vec<_>>>()?;

    Ok(Request::Command(Command::from_parts(kind, operands)))
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_field(writer, &response.encode())?;
    writer.flush()?;
    Ok(())
}

/// Read the text of a complete response from a stream
///
/// Decoding is left to the caller because a GET response needs the key that
/// was asked for (see `Response::decode_get`).
pub fn read_response<R: Read>(reader: &mut R) -> Result<String> {
    read_field(reader)
}
