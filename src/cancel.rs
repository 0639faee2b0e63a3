//! Cooperative cancellation for long merges
//!
//! A [`CancelToken`] is a shared flag. The pipeline polls it between sources
//! and stops with [`Error::Cancelled`](crate::error::Error::Cancelled) once it
//! is set. The binary sets it from a Ctrl-C handler.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use log::warn;

/// Exit code used when a second interrupt forces an immediate exit.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel this token on the first Ctrl-C and exit on the second.
    ///
    /// Only one handler can be installed per process.
    pub fn install_ctrlc_handler(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        let signals = Arc::new(AtomicU8::new(0));
        ctrlc::set_handler(move || {
            if signals.fetch_add(1, Ordering::SeqCst) == 0 {
                warn!("Interrupt received, stopping after the current source");
                token.cancel();
            } else {
                std::process::exit(EXIT_CODE_INTERRUPTED);
            }
        })
    }
}
