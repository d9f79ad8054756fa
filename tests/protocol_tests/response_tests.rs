//! Response Tests
//!
//! Tests for the colon-delimited response text.

use dualkv::protocol::{message, Response, Status};
use dualkv::KvError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_get_hit() {
    let resp = Response::success_with_value("hello", message::read_ok("a", "hello"));
    assert_eq!(resp.encode(), "1:hello:Successfully read key \"a\" with val \"hello\"");
}

#[test]
fn test_encode_success_without_value() {
    let resp = Response::success(message::delete_ok("a"));
    assert_eq!(resp.encode(), "1:Successfully removed key \"a\"");
}

#[test]
fn test_encode_failure() {
    let resp = Response::failure(message::invalid_command("FOO"));
    assert_eq!(resp.encode(), "-1:Invalid Command: FOO");
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_success() {
    let resp = Response::decode("1:Key \"a\" with value \"hello\" saved successfully").unwrap();
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value, None);
    assert_eq!(resp.message, "Key \"a\" with value \"hello\" saved successfully");
}

#[test]
fn test_decode_failure_keeps_colons_in_message() {
    let resp = Response::decode("-1:Invalid Command: FOO").unwrap();
    assert_eq!(resp.status, Status::Failure);
    assert_eq!(resp.message, "Invalid Command: FOO");
}

#[test]
fn test_any_other_leading_char_is_failure() {
    let resp = Response::decode("0:odd").unwrap();
    assert!(!resp.is_success());
    assert_eq!(resp.message, "odd");
}

#[test]
fn test_failure_without_colon_keeps_whole_text() {
    let resp = Response::decode("oops").unwrap();
    assert!(!resp.is_success());
    assert_eq!(resp.message, "oops");
}

#[test]
fn test_decode_empty_response() {
    assert!(matches!(Response::decode(""), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_get_hit() {
    let raw = "1:hello:Successfully read key \"a\" with val \"hello\"";
    let resp = Response::decode_get(raw, "a").unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.value.as_deref(), Some("hello"));
    assert_eq!(resp.message, "Successfully read key \"a\" with val \"hello\"");
}

#[test]
fn test_decode_get_value_containing_colons() {
    let value = "http://example.com:8080/a:b";
    let raw = Response::success_with_value(value, message::read_ok("url", value)).encode();

    let resp = Response::decode_get(&raw, "url").unwrap();
    assert_eq!(resp.value.as_deref(), Some(value));
    assert_eq!(resp.message, message::read_ok("url", value));
}

#[test]
fn test_decode_get_key_and_value_with_colons() {
    let (key, value) = ("k:1", ":v:");
    let raw = Response::success_with_value(value, message::read_ok(key, value)).encode();

    let resp = Response::decode_get(&raw, key).unwrap();
    assert_eq!(resp.value.as_deref(), Some(value));
}

#[test]
fn test_decode_get_with_shortened_message() {
    let value = "a:b";
    let full = Response::success_with_value(value, message::read_ok("k", value));
    let shortened = full.fit_within(full.encode().len() - 10).unwrap();

    let resp = Response::decode_get(&shortened.encode(), "k").unwrap();
    assert_eq!(resp.value.as_deref(), Some(value));
}

#[test]
fn test_decode_get_foreign_shape_falls_back_to_first_colon() {
    let resp = Response::decode_get("1:hello:some other message", "a").unwrap();
    assert_eq!(resp.value.as_deref(), Some("hello"));
    assert_eq!(resp.message, "some other message");
}

#[test]
fn test_decode_get_miss() {
    let raw = Response::failure(message::not_found("a")).encode();
    let resp = Response::decode_get(&raw, "a").unwrap();

    assert!(!resp.is_success());
    assert_eq!(resp.value, None);
    assert!(resp.message.contains("does not exist"));
}

#[test]
fn test_decode_get_without_value() {
    assert!(matches!(Response::decode_get("1:novalue", "a"), Err(KvError::Protocol(_))));
}

// =============================================================================
// Fitting Tests
// =============================================================================

#[test]
fn test_fit_within_leaves_small_response_alone() {
    let resp = Response::success("ok");
    assert_eq!(resp.fit_within(1024), Some(resp.clone()));
}

#[test]
fn test_fit_within_shortens_message_only() {
    let value = "v".repeat(900);
    let resp = Response::success_with_value(value.clone(), message::read_ok("k", &value));
    let fitted = resp.fit_within(1024).unwrap();

    assert_eq!(fitted.encode().len(), 1024);
    assert_eq!(fitted.value.as_deref(), Some(value.as_str()));
    assert!(resp.message.starts_with(&fitted.message));
}

#[test]
fn test_fit_within_respects_char_boundaries() {
    let resp = Response::failure("ééééé");
    // "-1:" plus 10 bytes of message; a 7 byte cut would split a character
    let fitted = resp.fit_within(3 + 7).unwrap();
    assert_eq!(fitted.message, "ééé");
}

#[test]
fn test_fit_within_gives_up_when_value_too_long() {
    let value = "v".repeat(1024);
    let resp = Response::success_with_value(value.clone(), message::read_ok("k", &value));
    assert_eq!(resp.fit_within(1024), None);
}
