//! Concurrent transfer pool for the opt-in parallel mode.
//!
//! Dispatcher + worker inbox design:
//! - single-consumer upstream `mpsc::Receiver` (dispatcher)
//! - per-worker `mpsc` inbox channels
//! - explicit sender drop on shutdown before awaiting workers
//!
//! File I/O runs on tokio's blocking pool. After the first failure, workers
//! drain their inboxes without starting new transfers.

use super::state::TransferState;
use super::transfer::transfer_one;
use crate::types::{CopyError, ManifestEntry};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Work item accepted by the transfer pool.
#[derive(Debug, Clone)]
pub struct TransferJob {
    pub index: usize,
    pub entry: ManifestEntry,
}

/// Runtime stats for the transfer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub enqueued: usize,
    pub dispatched: usize,
    pub completed: usize,
    pub skipped: usize,
    pub bytes_copied: u64,
    pub per_worker_completed: Vec<usize>,
}

impl PoolStats {
    fn new(workers: usize) -> Self {
        Self {
            workers,
            enqueued: 0,
            dispatched: 0,
            completed: 0,
            skipped: 0,
            bytes_copied: 0,
            per_worker_completed: vec![0; workers],
        }
    }
}

/// Shared by all workers of one pool
struct WorkerContext {
    source_root: PathBuf,
    destination_root: PathBuf,
    state: Arc<TransferState>,
    failed: AtomicBool,
    first_error: std::sync::Mutex<Option<CopyError>>,
}

impl WorkerContext {
    fn record_failure(&self, error: CopyError) {
        self.failed.store(true, Ordering::SeqCst);
        if let Ok(mut slot) = self.first_error.lock() {
            if slot.is_none() {
                *slot = Some(error);
            }
        }
    }
}

/// Multi-worker executor copying manifest entries concurrently.
pub struct ParallelExecutor {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<TransferJob>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    worker_handles: Vec<JoinHandle<()>>,
    stats: Arc<Mutex<PoolStats>>,
    context: Arc<WorkerContext>,
}

impl ParallelExecutor {
    /// Create a dispatcher + worker pool with bounded channels.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn new(
        worker_count: usize,
        queue_capacity: usize,
        source_root: PathBuf,
        destination_root: PathBuf,
        state: Arc<TransferState>,
    ) -> Result<Self, CopyError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .map_err(|e| CopyError::Runtime(format!("failed to start runtime: {}", e)))?;

        let stats = Arc::new(Mutex::new(PoolStats::new(workers)));
        let context = Arc::new(WorkerContext {
            source_root,
            destination_root,
            state,
            failed: AtomicBool::new(false),
            first_error: std::sync::Mutex::new(None),
        });
        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<TransferJob>(capacity);

        let mut worker_txs = Vec::with_capacity(workers);
        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let (worker_tx, worker_rx) = mpsc::channel::<TransferJob>(capacity);
            worker_txs.push(worker_tx);
            worker_handles.push(handle.spawn(worker_loop(
                worker_id,
                worker_rx,
                Arc::clone(&context),
                Arc::clone(&stats),
            )));
        }

        let dispatcher_handle = handle.spawn(dispatcher_loop(
            enqueue_rx,
            worker_txs,
            Arc::clone(&context),
            Arc::clone(&stats),
        ));

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            dispatcher_handle: Some(dispatcher_handle),
            worker_handles,
            stats,
            context,
        })
    }

    /// Whether any transfer has failed so far.
    pub fn has_failed(&self) -> bool {
        self.context.failed.load(Ordering::SeqCst)
    }

    /// Enqueue a job into upstream dispatcher queue.
    pub fn enqueue(&self, job: TransferJob) -> Result<(), CopyError> {
        let sender = self.enqueue_tx.as_ref().ok_or_else(|| {
            CopyError::Runtime("parallel executor queue is already closed".to_string())
        })?;
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async {
            sender.send(job).await.map_err(|_| {
                CopyError::Runtime("parallel executor queue receiver is closed".to_string())
            })?;

            let mut guard = stats.lock().await;
            guard.enqueued += 1;
            Ok(())
        })
    }

    /// Close queue input, wait for dispatcher/workers, and return the first
    /// transfer error if one occurred.
    pub fn close_and_wait(mut self) -> Result<PoolStats, CopyError> {
        self.enqueue_tx.take();

        let dispatcher = self.dispatcher_handle.take();
        let workers = std::mem::take(&mut self.worker_handles);
        let stats = Arc::clone(&self.stats);

        let stats = self.runtime.block_on(async move {
            if let Some(handle) = dispatcher {
                handle.await.map_err(map_join_error)?;
            }
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok::<_, CopyError>(stats.lock().await.clone())
        })?;

        let first_error = self
            .context
            .first_error
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        match first_error {
            Some(error) => Err(error),
            None => Ok(stats),
        }
    }
}

/// Round-robin jobs to worker inboxes; once a transfer has failed, jobs are
/// counted as skipped instead of dispatched.
async fn dispatcher_loop(
    mut enqueue_rx: mpsc::Receiver<TransferJob>,
    worker_txs: Vec<mpsc::Sender<TransferJob>>,
    context: Arc<WorkerContext>,
    stats: Arc<Mutex<PoolStats>>,
) {
    let mut next_worker = 0usize;

    while let Some(job) = enqueue_rx.recv().await {
        if context.failed.load(Ordering::SeqCst) {
            stats.lock().await.skipped += 1;
            continue;
        }

        let target = next_worker % worker_txs.len();
        next_worker = target + 1;
        match worker_txs[target].send(job).await {
            Ok(()) => stats.lock().await.dispatched += 1,
            Err(mpsc::error::SendError(job)) => {
                tracing::warn!(
                    worker = target,
                    index = job.index,
                    "Worker inbox closed, skipping {}",
                    job.entry.relative_path.display()
                );
                stats.lock().await.skipped += 1;
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    mut worker_rx: mpsc::Receiver<TransferJob>,
    context: Arc<WorkerContext>,
    stats: Arc<Mutex<PoolStats>>,
) {
    while let Some(job) = worker_rx.recv().await {
        if context.failed.load(Ordering::SeqCst) {
            stats.lock().await.skipped += 1;
            continue;
        }

        tracing::debug!(worker_id, index = job.index, "Copying {}", job.entry.relative_path.display());
        let ctx = Arc::clone(&context);
        let result = tokio::task::spawn_blocking(move || {
            transfer_one(&ctx.source_root, &ctx.destination_root, &job.entry, |n| {
                ctx.state.record(n)
            })
        })
        .await;

        match result {
            Ok(Ok(bytes)) => {
                let mut guard = stats.lock().await;
                guard.completed += 1;
                guard.bytes_copied += bytes;
                if let Some(slot) = guard.per_worker_completed.get_mut(worker_id) {
                    *slot += 1;
                }
            }
            Ok(Err(error)) => context.record_failure(error),
            Err(join_error) => context.record_failure(map_join_error(join_error)),
        }
    }
}

fn map_join_error(error: tokio::task::JoinError) -> CopyError {
    CopyError::Runtime(format!("parallel executor task failed: {}", error))
}
