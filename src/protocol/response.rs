//! Response definitions
//!
//! Represents responses to clients and their colon-delimited text form.
//!
//! ```text
//! GET hit      1:<value>:<message>
//! PUT/DELETE   1:<message>
//! failure      -1:<message>
//! ```

use crate::error::{KvError, Result};
use super::message;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// The status token that opens the encoded response
    pub fn code(&self) -> &'static str {
        match self {
            Status::Success => "1",
            Status::Failure => "-1",
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Echoed value (successful GET only)
    pub value: Option<String>,

    /// Human-readable message
    pub message: String,
}

impl Response {
    /// Create a success response without a value
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            value: None,
            message: message.into(),
        }
    }

    /// Create a success response echoing a value
    pub fn success_with_value(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            value: Some(value.into()),
            message: message.into(),
        }
    }

    /// Create a failure response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            value: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Encode to the colon-delimited wire text
    pub fn encode(&self) -> String {
        match &self.value {
            Some(value) => format!("{}:{}:{}", self.status.code(), value, self.message),
            None => format!("{}:{}", self.status.code(), self.message),
        }
    }

    /// Decode a response to a command that carries no value (PUT, DELETE).
    ///
    /// A leading `'1'` means success; anything else is a failure. The message
    /// is everything after the first `:`.
    pub fn decode(raw: &str) -> Result<Self> {
        let status = Self::status_of(raw)?;
        let message = match raw.split_once(':') {
            Some((_, rest)) => rest,
            None if status == Status::Failure => raw,
            None => "",
        };

        Ok(Self {
            status,
            value: None,
            message: message.to_string(),
        })
    }

    /// Decode a response to `GET key`.
    ///
    /// Values may themselves contain `:`, so splitting on the first colon is
    /// not enough. The server's message repeats the key and the value, so the
    /// split is taken at the first `:` whose remainder is (a prefix of)
    /// `read_ok(key, value)` for the value before it. Prefixes cover messages
    /// shortened to fit a datagram. Bodies of any other shape fall back to
    /// splitting at the first `:`.
    pub fn decode_get(raw: &str, key: &str) -> Result<Self> {
        let status = Self::status_of(raw)?;
        if status == Status::Failure {
            return Self::decode(raw);
        }

        let body = raw.split_once(':').map(|(_, rest)| rest).unwrap_or("");

        if let Some((value, message)) = Self::split_value(body, key) {
            return Ok(Self::success_with_value(value, message));
        }

        match body.split_once(':') {
            Some((value, message)) => Ok(Self::success_with_value(value, message)),
            None => Err(KvError::Protocol(format!(
                "GET response without a value: {:?}",
                raw
            ))),
        }
    }

    fn split_value<'a>(body: &'a str, key: &str) -> Option<(&'a str, &'a str)> {
        body.match_indices(':').find_map(|(idx, _)| {
            let (value, message) = (&body[..idx], &body[idx + 1..]);
            message::read_ok(key, value)
                .starts_with(message)
                .then_some((value, message))
        })
    }

    /// Shrink the response so its encoding fits in `limit` bytes.
    ///
    /// Only the message is shortened (at a character boundary); the status and
    /// value are never altered. Returns `None` when even an empty message
    /// would not fit.
    pub fn fit_within(&self, limit: usize) -> Option<Response> {
        let encoded_len = self.encode().len();
        if encoded_len <= limit {
            return Some(self.clone());
        }

        let overflow = encoded_len - limit;
        if overflow > self.message.len() {
            return None;
        }

        let mut cut = self.message.len() - overflow;
        while !self.message.is_char_boundary(cut) {
            cut -= 1;
        }

        let mut fitted = self.clone();
        fitted.message.truncate(cut);
        Some(fitted)
    }

    fn status_of(raw: &str) -> Result<Status> {
        match raw.chars().next() {
            Some('1') => Ok(Status::Success),
            Some(_) => Ok(Status::Failure),
            None => Err(KvError::Protocol("Empty response".to_string())),
        }
    }
}
