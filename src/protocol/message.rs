//! Response messages
//!
//! The human-readable text carried after the status digit. The client reuses
//! `read_ok` to pick the value back out of a GET response.

use super::MAX_FIELD_LEN;

pub fn read_ok(key: &str, value: &str) -> String {
    format!("Successfully read key \"{}\" with val \"{}\"", key, value)
}

pub fn put_ok(key: &str, value: &str) -> String {
    format!("Key \"{}\" with value \"{}\" saved successfully", key, value)
}

pub fn delete_ok(key: &str) -> String {
    format!("Successfully removed key \"{}\"", key)
}

/// Miss on GET or DELETE
pub fn not_found(key: &str) -> String {
    format!("The key \"{}\" does not exist in the store", key)
}

pub fn invalid_command(raw: &str) -> String {
    format!("Invalid Command: {}", raw)
}

pub fn key_too_large(size: usize) -> String {
    format!("Key length {} exceeds {} bytes", size, MAX_FIELD_LEN)
}

pub fn value_too_large(size: usize) -> String {
    format!("Value length {} exceeds {} bytes", size, MAX_FIELD_LEN)
}

/// Sent when the answer to a GET would not fit in one datagram
pub fn response_too_large(size: usize) -> String {
    format!("Response of {} bytes does not fit in a {} byte datagram", size, MAX_FIELD_LEN)
}
