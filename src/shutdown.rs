//! Cancellation
//!
//! A cloneable token the Ctrl+C handler flips and the serving/input loops
//! check between blocking operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{KvError, Result};

/// Shared cancellation flag with a wakeup channel
///
/// Loops that poll call `is_cancelled`. Loops blocked in a
/// `crossbeam::select!` add `cancelled()` as one of the arms; it becomes ready
/// once `cancel` has been called.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify_tx: Sender<()>,
    notify_rx: Receiver<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (notify_tx, notify_rx) = channel::bounded(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify_tx,
            notify_rx,
        }
    }

    /// Request cancellation. Calling it more than once is harmless.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            // Capacity 1 and only the first caller sends, so this cannot block
            let _ = self.notify_tx.try_send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Channel that yields once cancellation is requested
    ///
    /// Only one receiver observes the wakeup; callers that need to re-check
    /// should use `is_cancelled`.
    pub fn cancelled(&self) -> &Receiver<()> {
        &self.notify_rx
    }

    /// Install this token as the process Ctrl+C handler
    pub fn cancel_on_ctrl_c(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("Received Ctrl+C, initiating shutdown...");
            token.cancel();
        })
        .map_err(|e| KvError::Config(format!("Failed to install Ctrl+C handler: {}", e)))
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
