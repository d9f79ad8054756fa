//! Request Handler Tests
//!
//! Tests verify:
//! - Response text for every command outcome
//! - QUIT ends the session without a reply
//! - Unknown tags and oversized operands leave the store untouched

use std::net::SocketAddr;
use std::sync::Arc;

use dualkv::handler::{Outcome, RequestHandler};
use dualkv::protocol::{Command, Request, Response, Status, MAX_FIELD_LEN};
use dualkv::Store;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (Arc<Store>, RequestHandler) {
    let store = Arc::new(Store::new());
    let handler = RequestHandler::new(Arc::clone(&store));
    (store, handler)
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn reply(handler: &RequestHandler, command: Command) -> Response {
    match handler.execute(command, peer()) {
        Outcome::Reply(response) => response,
        Outcome::Quit => panic!("Expected a reply"),
    }
}

fn get(key: &str) -> Command {
    Command::Get { key: key.to_string() }
}

fn put(key: &str, value: &str) -> Command {
    Command::Put {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn delete(key: &str) -> Command {
    Command::Delete { key: key.to_string() }
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_put_then_get() {
    let (store, handler) = setup();

    let resp = reply(&handler, put("a", "hello"));
    assert_eq!(resp.encode(), "1:Key \"a\" with value \"hello\" saved successfully");
    assert_eq!(store.get("a").unwrap(), "hello");

    let resp = reply(&handler, get("a"));
    assert_eq!(resp.encode(), "1:hello:Successfully read key \"a\" with val \"hello\"");
}

#[test]
fn test_get_miss() {
    let (_store, handler) = setup();

    let resp = reply(&handler, get("nope"));
    assert_eq!(resp.status, Status::Failure);
    assert_eq!(resp.encode(), "-1:The key \"nope\" does not exist in the store");
}

#[test]
fn test_overwrite() {
    let (_store, handler) = setup();

    reply(&handler, put("k", "v1"));
    reply(&handler, put("k", "v2"));

    assert_eq!(reply(&handler, get("k")).value.as_deref(), Some("v2"));
}

#[test]
fn test_delete_then_delete_again() {
    let (store, handler) = setup();
    reply(&handler, put("a", "hello"));

    let first = reply(&handler, delete("a"));
    assert_eq!(first.encode(), "1:Successfully removed key \"a\"");
    assert!(store.is_empty());

    let second = reply(&handler, delete("a"));
    assert_eq!(second.status, Status::Failure);
    assert!(second.message.contains("does not exist"));
}

#[test]
fn test_quit_has_no_reply() {
    let (_store, handler) = setup();
    assert_eq!(handler.execute(Command::Quit, peer()), Outcome::Quit);
}

#[test]
fn test_invalid_command() {
    let (store, handler) = setup();
    reply(&handler, put("a", "hello"));

    let outcome = handler.handle(Request::Invalid("FOO".to_string()), peer());
    match outcome {
        Outcome::Reply(resp) => {
            assert_eq!(resp.status, Status::Failure);
            assert!(resp.message.contains("Invalid Command: FOO"));
        }
        Outcome::Quit => panic!("Expected a reply"),
    }

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("a").unwrap(), "hello");
}

// =============================================================================
// Size Limit Tests
// =============================================================================

#[test]
fn test_key_at_limit_is_accepted() {
    let (store, handler) = setup();
    let key = "k".repeat(MAX_FIELD_LEN);
    let value = "v".repeat(MAX_FIELD_LEN);

    assert!(reply(&handler, put(&key, &value)).is_success());
    assert_eq!(store.get(&key).unwrap(), value);
}

#[test]
fn test_oversized_key_rejected() {
    let (store, handler) = setup();
    let key = "k".repeat(MAX_FIELD_LEN + 1);

    let resp = reply(&handler, put(&key, "v"));
    assert_eq!(resp.status, Status::Failure);
    assert!(resp.message.contains("Key length 1025"));
    assert!(store.is_empty());

    assert_eq!(reply(&handler, get(&key)).status, Status::Failure);
    assert_eq!(reply(&handler, delete(&key)).status, Status::Failure);
}

#[test]
fn test_oversized_value_rejected() {
    let (store, handler) = setup();
    let value = "v".repeat(MAX_FIELD_LEN + 1);

    let resp = reply(&handler, put("k", &value));
    assert_eq!(resp.status, Status::Failure);
    assert!(resp.message.contains("Value length 1025"));
    assert!(store.is_empty());
}

// =============================================================================
// Shared Store Tests
// =============================================================================

#[test]
fn test_handlers_share_one_store() {
    let (store, first) = setup();
    let second = RequestHandler::new(Arc::clone(&store));

    reply(&first, put("shared", "yes"));
    assert_eq!(reply(&second, get("shared")).value.as_deref(), Some("yes"));
    assert!(Arc::ptr_eq(first.store(), second.store()));
}

#[test]
fn test_separate_stores_are_isolated() {
    let (_a, first) = setup();
    let (_b, second) = setup();

    reply(&first, put("k", "v"));
    assert_eq!(reply(&second, get("k")).status, Status::Failure);
}
