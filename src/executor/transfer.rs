//! Streaming single-file copy with byte accounting

use crate::types::{CopyError, ManifestEntry};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// Chunk size for streaming copies
pub const CHUNK_SIZE: usize = 128 * 1024;

/// Pass-through reader that reports every chunk it yields
pub struct ByteCounter<R, F> {
    inner: R,
    on_bytes: F,
    total: u64,
}

impl<R: Read, F: FnMut(u64)> ByteCounter<R, F> {
    pub fn new(inner: R, on_bytes: F) -> Self {
        Self {
            inner,
            on_bytes,
            total: 0,
        }
    }

    /// Bytes read through this counter so far
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl<R: Read, F: FnMut(u64)> Read for ByteCounter<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.total += n as u64;
            (self.on_bytes)(n as u64);
        }
        Ok(n)
    }
}

/// Copy one manifest entry from `source_root` to `destination_root`
///
/// Missing parent directories of the destination are created first. Each
/// chunk is reported through `on_bytes` before it is written. The call
/// returns once the destination has been flushed, synced and closed.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(CopyError::Transfer)` - open, read or write failed; a partially
///   written destination file is left in place
pub fn transfer_one<F>(
    source_root: &Path,
    destination_root: &Path,
    entry: &ManifestEntry,
    on_bytes: F,
) -> Result<u64, CopyError>
where
    F: FnMut(u64),
{
    let src = source_root.join(&entry.relative_path);
    let dest = destination_root.join(&entry.relative_path);
    let fail = |source: io::Error| CopyError::Transfer {
        path: entry.relative_path.clone(),
        source,
    };

    // Prepare
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    // Copy
    let src_file = File::open(&src).map_err(fail)?;
    let mut dest_file = File::create(&dest).map_err(fail)?;
    let mut reader = ByteCounter::new(src_file, on_bytes);

    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(fail(e)),
        };

        dest_file.write_all(&buffer[..bytes_read]).map_err(fail)?;
    }

    // Flush
    dest_file.flush().map_err(fail)?;
    dest_file.sync_all().map_err(fail)?;
    drop(dest_file);

    tracing::debug!(
        bytes = reader.total(),
        "Copied {}",
        entry.relative_path.display()
    );
    Ok(reader.total())
}
