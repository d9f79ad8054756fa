//! Request Handler
//!
//! Interprets decoded requests against the store and builds responses.
//! Shared by the stream and datagram servers; framing stays in the codecs.
//!
//! ## Responsibilities
//! - Enforce the key/value size limit before the store is touched
//! - Route GET/PUT/DELETE to the store
//! - Turn QUIT into a session-ending outcome
//! - Answer unknown tags with an `Invalid Command` failure
//! - Log every request and its result with the peer address

use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::KvError;
use crate::protocol::{message, Command, Request, Response, MAX_FIELD_LEN};
use crate::store::Store;

/// What the serving loop should do after a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send this response and keep serving
    Reply(Response),

    /// The client asked to end its session; no response is sent
    Quit,
}

/// Executes requests against a shared store
#[derive(Debug, Clone)]
pub struct RequestHandler {
    store: Arc<Store>,
}

impl RequestHandler {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// The store this handler mutates
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Handle one decoded request from `peer`
    pub fn handle(&self, request: Request, peer: SocketAddr) -> Outcome {
        match request {
            Request::Command(command) => self.execute(command, peer),
            Request::Invalid(raw) => {
                tracing::warn!(%peer, "Invalid Command: {}", raw);
                Outcome::Reply(Response::failure(message::invalid_command(&raw)))
            }
        }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command, peer: SocketAddr) -> Outcome {
        if let Some(rejection) = Self::check_sizes(&command) {
            tracing::warn!(%peer, "Rejected {}: {}", command.command_type().as_str(), rejection.message);
            return Outcome::Reply(rejection);
        }

        match command {
            Command::Get { key } => Outcome::Reply(self.get(&key, peer)),
            Command::Put { key, value } => Outcome::Reply(self.put(key, value, peer)),
            Command::Delete { key } => Outcome::Reply(self.delete(&key, peer)),
            Command::Quit => {
                tracing::info!(%peer, "Received QUIT request");
                Outcome::Quit
            }
        }
    }

    fn check_sizes(command: &Command) -> Option<Response> {
        let (key, value) = match command {
            Command::Get { key } | Command::Delete { key } => (key, None),
            Command::Put { key, value } => (key, Some(value)),
            Command::Quit => return None,
        };

        if key.len() > MAX_FIELD_LEN {
            return Some(Response::failure(message::key_too_large(key.len())));
        }
        match value {
            Some(value) if value.len() > MAX_FIELD_LEN => {
                Some(Response::failure(message::value_too_large(value.len())))
            }
            _ => None,
        }
    }

    fn get(&self, key: &str, peer: SocketAddr) -> Response {
        tracing::info!(%peer, "Received GET request to read key {:?}", key);

        match self.store.get(key) {
            Ok(value) => {
                let message = message::read_ok(key, &value);
                tracing::info!(%peer, "{}", message);
                Response::success_with_value(value, message)
            }
            Err(e) => self.miss(key, e, peer),
        }
    }

    fn put(&self, key: String, value: String, peer: SocketAddr) -> Response {
        tracing::info!(%peer, "Received PUT request to put key {:?} with value {:?}", key, value);

        let message = message::put_ok(&key, &value);
        self.store.put(key, value);
        tracing::info!(%peer, "{}", message);
        Response::success(message)
    }

    fn delete(&self, key: &str, peer: SocketAddr) -> Response {
        tracing::info!(%peer, "Received DELETE request to remove key {:?}", key);

        match self.store.delete(key) {
            Ok(_) => {
                let message = message::delete_ok(key);
                tracing::info!(%peer, "{}", message);
                Response::success(message)
            }
            Err(e) => self.miss(key, e, peer),
        }
    }

    fn miss(&self, key: &str, err: KvError, peer: SocketAddr) -> Response {
        let message = message::not_found(key);
        tracing::warn!(%peer, error = %err, "{}", message);
        Response::failure(message)
    }
}
