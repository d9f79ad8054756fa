//! Codec Tests
//!
//! Tests for the stream (TCP) field framing and request/response I/O.

use std::io::Cursor;

use bytes::BytesMut;

use dualkv::protocol::{
    Command, Request, Response,
    encode_field, decode_field, take_field, encode_request,
    read_field, write_field,
    read_request, write_request,
    read_response, write_response,
};
use dualkv::KvError;

// =============================================================================
// Field Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_field_has_big_endian_length_prefix() {
    let encoded = encode_field("GET").unwrap();
    assert_eq!(&encoded[..], &[0x00, 0x03, b'G', b'E', b'T']);
}

#[test]
fn test_encode_decode_field() {
    let encoded = encode_field("hello").unwrap();
    let (field, consumed) = decode_field(&encoded).unwrap();

    assert_eq!(field, "hello");
    assert_eq!(consumed, encoded.len());
}

#[test]
fn test_field_with_colons_and_spaces() {
    let text = "a:b: c::d";
    let encoded = encode_field(text).unwrap();
    let (field, _) = decode_field(&encoded).unwrap();
    assert_eq!(field, text);
}

#[test]
fn test_field_with_multibyte_utf8() {
    let text = "clé→värde 🔑";
    let encoded = encode_field(text).unwrap();

    // Prefix counts bytes, not characters
    assert_eq!(u16::from_be_bytes([encoded[0], encoded[1]]) as usize, text.len());

    let (field, _) = decode_field(&encoded).unwrap();
    assert_eq!(field, text);
}

#[test]
fn test_empty_field() {
    let encoded = encode_field("").unwrap();
    assert_eq!(&encoded[..], &[0x00, 0x00]);

    let (field, consumed) = decode_field(&encoded).unwrap();
    assert!(field.is_empty());
    assert_eq!(consumed, 2);
}

#[test]
fn test_decode_field_leaves_trailing_bytes() {
    let mut bytes = encode_field("first").unwrap().to_vec();
    bytes.extend_from_slice(&encode_field("second").unwrap());

    let (first, consumed) = decode_field(&bytes).unwrap();
    let (second, _) = decode_field(&bytes[consumed..]).unwrap();

    assert_eq!(first, "first");
    assert_eq!(second, "second");
}

#[test]
fn test_field_too_long_to_encode() {
    let text = "x".repeat(u16::MAX as usize + 1);
    let result = encode_field(&text);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_take_field_waits_for_whole_field() {
    let encoded = encode_field("hello").unwrap();
    let mut buf = BytesMut::new();

    // Prefix only
    buf.extend_from_slice(&encoded[..2]);
    assert!(take_field(&mut buf).is_none());
    assert_eq!(buf.len(), 2);

    // Rest of the field plus the start of the next one
    buf.extend_from_slice(&encoded[2..]);
    buf.extend_from_slice(&[0x00]);
    assert_eq!(take_field(&mut buf).unwrap().unwrap(), "hello");
    assert_eq!(&buf[..], &[0x00]);
}

#[test]
fn test_take_field_consumes_invalid_utf8() {
    let mut buf = BytesMut::from(&[0x00, 0x02, 0xC3, 0x28, 0x00, 0x00][..]);

    assert!(matches!(take_field(&mut buf), Some(Err(KvError::Protocol(_)))));
    assert_eq!(take_field(&mut buf).unwrap().unwrap(), "");
    assert!(buf.is_empty());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_incomplete_prefix() {
    let result = decode_field(&[0x00]);
    assert!(result.unwrap_err().to_string().contains("Incomplete length prefix"));
}

#[test]
fn test_incomplete_field() {
    // Prefix says 10 bytes, only 3 follow
    let result = decode_field(&[0x00, 0x0A, b'a', b'b', b'c']);
    assert!(result.unwrap_err().to_string().contains("Incomplete field"));
}

#[test]
fn test_invalid_utf8_field() {
    let result = decode_field(&[0x00, 0x02, 0xC3, 0x28]);
    assert!(result.unwrap_err().to_string().contains("not valid UTF-8"));
}

#[test]
fn test_read_field_eof_is_connection_closed() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    let result = read_field(&mut cursor);
    assert!(matches!(result, Err(KvError::ConnectionClosed)));
}

#[test]
fn test_read_field_truncated_is_connection_closed() {
    let mut cursor = Cursor::new(vec![0x00, 0x05, b'a', b'b']);
    let result = read_field(&mut cursor);
    assert!(matches!(result, Err(KvError::ConnectionClosed)));
}

// =============================================================================
// Request Tests
// =============================================================================

#[test]
fn test_request_field_order() {
    let cmd = Command::Put {
        key: "k".to_string(),
        value: "v".to_string(),
    };
    let encoded = encode_request(&cmd).unwrap();

    let mut expected = encode_field("PUT").unwrap().to_vec();
    expected.extend_from_slice(&encode_field("k").unwrap());
    expected.extend_from_slice(&encode_field("v").unwrap());
    assert_eq!(encoded.to_vec(), expected);
}

#[test]
fn test_quit_is_a_single_field() {
    let encoded = encode_request(&Command::Quit).unwrap();
    assert_eq!(encoded.to_vec(), encode_field("QUIT").unwrap().to_vec());
}

#[test]
fn test_write_read_request() {
    let commands = vec![
        Command::Get { key: "a".to_string() },
        Command::Put { key: "a".to_string(), value: "hello: world".to_string() },
        Command::Delete { key: "a".to_string() },
        Command::Quit,
    ];

    let mut buffer = Vec::new();
    for cmd in &commands {
        write_request(&mut buffer, cmd).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for cmd in commands {
        assert_eq!(read_request(&mut cursor).unwrap(), Request::Command(cmd));
    }
}

#[test]
fn test_unknown_tag_is_invalid_request() {
    let mut buffer = Vec::new();
    write_field(&mut buffer, "FOO").unwrap();
    write_field(&mut buffer, "GET").unwrap();
    write_field(&mut buffer, "k").unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_request(&mut cursor).unwrap(), Request::Invalid("FOO".to_string()));

    // Nothing past the unknown tag was consumed
    assert_eq!(
        read_request(&mut cursor).unwrap(),
        Request::Command(Command::Get { key: "k".to_string() })
    );
}

#[test]
fn test_tags_are_case_sensitive() {
    let mut buffer = Vec::new();
    write_field(&mut buffer, "get").unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_request(&mut cursor).unwrap(), Request::Invalid("get".to_string()));
}

#[test]
fn test_invalid_utf8_operand_keeps_stream_aligned() {
    let mut buffer = Vec::new();
    write_field(&mut buffer, "PUT").unwrap();
    buffer.extend_from_slice(&[0x00, 0x02, 0xC3, 0x28]);
    write_field(&mut buffer, "value").unwrap();
    write_field(&mut buffer, "QUIT").unwrap();

    let mut cursor = Cursor::new(buffer);
    assert!(matches!(read_request(&mut cursor), Err(KvError::Protocol(_))));
    assert_eq!(read_request(&mut cursor).unwrap(), Request::Command(Command::Quit));
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_write_read_response() {
    let resp = Response::success_with_value("hello", "Successfully read key \"a\" with val \"hello\"");

    let mut buffer = Vec::new();
    write_response(&mut buffer, &resp).unwrap();

    let mut cursor = Cursor::new(buffer);
    let raw = read_response(&mut cursor).unwrap();
    assert_eq!(raw, "1:hello:Successfully read key \"a\" with val \"hello\"");
}

#[test]
fn test_failure_response_on_the_wire() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::failure("Invalid Command: FOO")).unwrap();

    let (field, _) = decode_field(&buffer).unwrap();
    assert_eq!(field, "-1:Invalid Command: FOO");
}
