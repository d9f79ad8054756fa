//! Protocol Module
//!
//! Defines the wire protocol shared by the stream and datagram transports.
//!
//! ## Commands
//! - `GET <key>`
//! - `PUT <key> <value>`
//! - `DELETE <key>`
//! - `QUIT`
//!
//! Tags are case-sensitive strings sent as the first field of a request.
//!
//! ## Framing
//! - Stream: each field is a 2-byte length prefix plus UTF-8 bytes (`codec`)
//! - Datagram: each field is one packet, no prefix (`datagram`)
//!
//! ## Responses
//! ```text
//! 1:<value>:<message>    GET hit
//! 1:<message>            PUT / DELETE success
//! -1:<message>           any failure
//! ```
//!
//! ## Limits
//! Keys and values are at most `MAX_FIELD_LEN` bytes; so is every datagram.

mod command;
mod response;
pub mod codec;
pub mod datagram;
pub mod message;

pub use command::{Command, CommandType, Request};
pub use response::{Response, Status};
pub use codec::{
    encode_field, decode_field, take_field, encode_request,
    read_field, write_field,
    read_request, write_request,
    read_response, write_response,
};
pub use datagram::{decode_datagram, encode_datagram, recv_datagram, send_datagram, send_request};

/// Maximum size in bytes of a key, a value, or a datagram payload
pub const MAX_FIELD_LEN: usize = 1024;
