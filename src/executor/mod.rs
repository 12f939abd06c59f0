//! Copy orchestration: validate, enumerate, transfer, report

pub mod pool;
pub mod reporter;
pub mod state;
pub mod transfer;
pub mod validate;

use crate::config::{Config, TransferMode};
use crate::scanner::{enumerate, GlobMatcher, Matcher};
use crate::types::{CopyError, Manifest};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub use pool::{ParallelExecutor, PoolStats, TransferJob};
pub use reporter::{ProgressCallback, ProgressReporter, ReporterHandle, PROGRESS_INTERVAL};
pub use state::TransferState;
pub use transfer::{transfer_one, ByteCounter, CHUNK_SIZE};
pub use validate::{create_directory, ensure_directory};

/// Outcome of a successful copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub files_copied: usize,
    pub bytes_copied: u64,
    /// Manifest size at enumeration time
    pub total_size: u64,
    pub elapsed: Duration,
}

/// Copy every file matched by `config.patterns` from source to destination
///
/// Uses [`GlobMatcher`] for file selection. See [`copy_with_matcher`].
pub fn copy(
    config: &Config,
    on_progress: Option<&ProgressCallback<'_>>,
) -> Result<CopySummary, CopyError> {
    copy_with_matcher(config, &GlobMatcher, on_progress)
}

/// Copy with a caller-supplied [`Matcher`]
///
/// Runs validation, destination creation, enumeration and the transfers in
/// that order, stopping at the first error. The progress reporter (if a
/// callback is given) is always stopped before this function returns, on
/// success and on failure alike.
///
/// Parallel mode builds its own tokio runtime and must not be used from
/// inside an async context.
pub fn copy_with_matcher(
    config: &Config,
    matcher: &dyn Matcher,
    on_progress: Option<&ProgressCallback<'_>>,
) -> Result<CopySummary, CopyError> {
    copy_with_interval(config, matcher, on_progress, PROGRESS_INTERVAL)
}

pub(crate) fn copy_with_interval(
    config: &Config,
    matcher: &dyn Matcher,
    on_progress: Option<&ProgressCallback<'_>>,
    interval: Duration,
) -> Result<CopySummary, CopyError> {
    let state = Arc::new(TransferState::new());
    config.validate()?;

    tracing::info!(
        "Validating {} -> {}",
        config.source.display(),
        config.destination.display()
    );
    ensure_directory(&config.source, true)?;
    ensure_directory(&config.destination, false)?;
    create_directory(&config.destination)?;

    let manifest = enumerate(&config.source, &config.patterns, &config.options, matcher)?;

    let result = thread::scope(|scope| {
        let reporter = ProgressReporter::start_with_interval(
            scope,
            manifest.total_size(),
            &state,
            on_progress,
            interval,
        );
        let result = run_transfers(config, &manifest, &state);
        reporter.stop();
        result
    });

    let bytes_copied = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Copy aborted during {}: {}", e.stage(), e);
            return Err(e);
        }
    };

    let summary = CopySummary {
        files_copied: manifest.len(),
        bytes_copied,
        total_size: manifest.total_size(),
        elapsed: state.elapsed(),
    };
    tracing::info!(
        files = summary.files_copied,
        bytes = summary.bytes_copied,
        "Copy complete in {:?}",
        summary.elapsed
    );
    Ok(summary)
}

fn run_transfers(
    config: &Config,
    manifest: &Manifest,
    state: &Arc<TransferState>,
) -> Result<u64, CopyError> {
    match config.mode {
        TransferMode::Sequential => {
            let mut bytes_copied = 0u64;
            for (index, entry) in manifest.iter().enumerate() {
                tracing::debug!(index, "Copying {}", entry.relative_path.display());
                bytes_copied += transfer_one(&config.source, &config.destination, entry, |n| {
                    state.record(n)
                })?;
            }
            Ok(bytes_copied)
        }
        TransferMode::Parallel { workers } => {
            tracing::info!(workers, "Copying {} files in parallel", manifest.len());
            let pool = ParallelExecutor::new(
                workers,
                workers * 2,
                config.source.clone(),
                config.destination.clone(),
                Arc::clone(state),
            )?;
            for (index, entry) in manifest.iter().enumerate() {
                if pool.has_failed() {
                    break;
                }
                pool.enqueue(TransferJob {
                    index,
                    entry: entry.clone(),
                })?;
            }
            let stats = pool.close_and_wait()?;
            Ok(stats.bytes_copied)
        }
    }
}
