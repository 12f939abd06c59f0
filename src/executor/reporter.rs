//! Periodic aggregate progress reporting

use super::state::TransferState;
use crate::types::{Manifest, ProgressSnapshot};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

/// Time between progress snapshots
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Observer receiving progress snapshots
///
/// The lifetime lets observers borrow caller state, e.g. a local `Mutex`.
pub type ProgressCallback<'a> = dyn Fn(&ProgressSnapshot) + Send + Sync + 'a;

/// Samples a [`TransferState`] on a fixed timer and forwards snapshots
pub struct ProgressReporter;

/// Running (or inert) reporter returned by [`ProgressReporter::start`]
///
/// Dropping the handle also ends the timer thread, but only [`stop`](Self::stop)
/// waits for it and guarantees no callback is still running.
pub struct ReporterHandle<'scope> {
    running: Option<Running<'scope>>,
}

struct Running<'scope> {
    stop_tx: mpsc::Sender<()>,
    thread: ScopedJoinHandle<'scope, ()>,
}

impl ProgressReporter {
    /// Start reporting progress against `manifest`'s total size
    ///
    /// Without a callback no thread is spawned and the handle is inert.
    pub fn start<'scope, 'env>(
        scope: &'scope Scope<'scope, 'env>,
        manifest: &Manifest,
        state: &'env TransferState,
        on_progress: Option<&'env ProgressCallback<'env>>,
    ) -> ReporterHandle<'scope> {
        Self::start_with_interval(
            scope,
            manifest.total_size(),
            state,
            on_progress,
            PROGRESS_INTERVAL,
        )
    }

    pub(crate) fn start_with_interval<'scope, 'env>(
        scope: &'scope Scope<'scope, 'env>,
        total: u64,
        state: &'env TransferState,
        on_progress: Option<&'env ProgressCallback<'env>>,
        interval: Duration,
    ) -> ReporterHandle<'scope> {
        let Some(callback) = on_progress else {
            return ReporterHandle { running: None };
        };

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = scope.spawn(move || {
            let mut last_bytes = 0u64;
            let mut last_tick = state.started_at();

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let now = Instant::now();
                let transferred = state.transferred();
                let snapshot = ProgressSnapshot::compute(
                    total,
                    transferred,
                    now.duration_since(state.started_at()),
                )
                .with_instant_speed(
                    transferred.saturating_sub(last_bytes),
                    now.duration_since(last_tick),
                );
                last_bytes = transferred;
                last_tick = now;

                deliver(callback, &snapshot);
            }
        });

        ReporterHandle {
            running: Some(Running { stop_tx, thread }),
        }
    }
}

impl ReporterHandle<'_> {
    /// Whether a timer thread is running
    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// Cancel the timer and wait for any in-flight tick to finish
    pub fn stop(self) {
        if let Some(running) = self.running {
            let _ = running.stop_tx.send(());
            if running.thread.join().is_err() {
                tracing::warn!("Progress reporter thread panicked");
            }
        }
    }
}

/// Invoke the callback, keeping the timer alive if it panics
fn deliver(callback: &ProgressCallback<'_>, snapshot: &ProgressSnapshot) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot)));
    if let Err(payload) = result {
        tracing::warn!(
            "Progress callback panicked: {}",
            panic_message(payload.as_ref())
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic>"
    }
}
