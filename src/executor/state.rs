//! Shared byte counter for one copy run

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Bytes transferred so far in one `copy` call and when the call started
///
/// Only ever increases. Written by transfers, read by the progress reporter.
#[derive(Debug)]
pub struct TransferState {
    transferred: AtomicU64,
    started_at: Instant,
}

impl TransferState {
    pub fn new() -> Self {
        Self {
            transferred: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Add `bytes` to the running total
    pub fn record(&self, bytes: u64) {
        self.transferred.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Relaxed)
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for TransferState {
    fn default() -> Self {
        Self::new()
    }
}
