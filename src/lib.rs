//! # DualKV
//!
//! A minimal in-memory key-value store served over two transports:
//! - TCP, with length-prefixed string fields
//! - UDP, with one field per datagram and no reassembly
//!
//! Both speak the same textual protocol (`GET`, `PUT`, `DELETE`, `QUIT`) and
//! answer with `1:`/`-1:` prefixed responses.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐                       ┌──────────────────┐
//! │     KvClient     │                       │  Stream/Datagram │
//! │ (build, validate,│ ── codec ── net ───▶  │      Server      │
//! │  parse replies)  │ ◀── codec ── net ──── │ (sequential loop)│
//! └──────────────────┘                       └────────┬─────────┘
//!                                                     │
//!                                            ┌────────▼─────────┐
//!                                            │  RequestHandler  │
//!                                            └────────┬─────────┘
//!                                                     │
//!                                            ┌────────▼─────────┐
//!                                            │      Store       │
//!                                            │ (RwLock HashMap) │
//!                                            └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod shutdown;

pub mod store;
pub mod protocol;
pub mod handler;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, TransportKind};
pub use store::Store;
pub use handler::RequestHandler;
pub use shutdown::CancellationToken;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DualKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
