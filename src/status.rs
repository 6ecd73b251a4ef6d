//! Stage lifecycle handles: `SourceStatus` / `HuntStatus`.
//!
//! Both are the same shape: a "done" flag plus a cancellation signal, so
//! one `StageStatus` type backs both named handles, using the same
//! `cancel_token: tokio_util::sync::CancellationToken` pattern as the
//! batched downloader.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct StageStatus {
    done: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl StageStatus {
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
        }
    }

    /// Once set, stays set: the monotonicity invariant backing
    /// `Scavenger::is_finished()`.
    pub fn mark_done(&self) {
        self.done.store(true, Ordering::Release);
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Idempotent: cancelling an already-cancelled token is a no-op by
    /// `tokio_util`'s own design.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::new()
    }
}

pub type SourceStatus = StageStatus;
pub type HuntStatus = StageStatus;
