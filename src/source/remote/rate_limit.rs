//! Consecutive-failure counter backing the batched downloader's rate-limit
//! warning cadence.
//!
//! Kept as an injectable `Arc<AtomicU32>`-backed struct rather than a
//! process-global `static`, so tests can construct a fresh one per case
//! instead of fighting shared state between test threads.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct FailureCounter {
    count: Arc<AtomicU32>,
    warn_every: u32,
}

impl FailureCounter {
    pub fn new(warn_every: u32) -> Self {
        Self {
            count: Arc::new(AtomicU32::new(0)),
            warn_every: warn_every.max(1),
        }
    }

    /// Record a failure; returns `true` exactly when this failure lands on
    /// a `warn_every` boundary (e.g. the 5th, 10th, 15th... consecutive
    /// failure with the default cadence of 5).
    pub fn record_failure(&self) -> bool {
        let n = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        n % self.warn_every == 0
    }

    /// A success resets the consecutive-failure streak.
    pub fn record_success(&self) {
        self.count.store(0, Ordering::Release);
    }

    pub fn current(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_consecutive_failures_warn_exactly_twice() {
        let counter = FailureCounter::new(5);
        let warnings = (0..11).filter(|_| counter.record_failure()).count();
        assert_eq!(warnings, 2);
    }

    #[test]
    fn success_resets_the_streak() {
        let counter = FailureCounter::new(5);
        for _ in 0..4 {
            counter.record_failure();
        }
        counter.record_success();
        assert_eq!(counter.current(), 0);
        assert!(!counter.record_failure());
    }
}
