//! Directory checks and creation

use crate::types::CopyError;
use std::fs;
use std::path::Path;

/// Check that `path` is a directory, or absent when `must_exist` is false
///
/// Inspects only; nothing is created. A path that cannot be stat'ed is
/// treated like a missing one.
pub fn ensure_directory(path: &Path, must_exist: bool) -> Result<(), CopyError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(CopyError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) => {
            if must_exist {
                tracing::debug!("Cannot stat {}: {}", path.display(), e);
                Err(CopyError::MissingDirectory {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(())
            }
        }
    }
}

/// Create `path` and any missing parents; succeeds if it already exists
pub fn create_directory(path: &Path) -> Result<(), CopyError> {
    fs::create_dir_all(path).map_err(|source| CopyError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}
