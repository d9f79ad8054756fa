//! Store Module
//!
//! The server's in-memory key-value mapping.
//!
//! ## Responsibilities
//! - Hold string keys and string values for the life of the process
//! - Insert-or-overwrite on PUT, remove-if-present on DELETE
//! - Nothing is persisted; the mapping is dropped with the server
//!
//! ## Sharing
//! The store is handed to the serving loops as an `Arc<Store>`. Serving is
//! sequential, but the map still sits behind an `RwLock` so several servers
//! (and tests) can hold the same handle safely.

mod table;

pub use table::Store;
