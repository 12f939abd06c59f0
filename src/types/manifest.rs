//! Manifest - the ordered list of files selected for copying

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One file selected for copying
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Path relative to the source root
    pub relative_path: PathBuf,

    /// File size in bytes at enumeration time
    pub size: u64,
}

impl ManifestEntry {
    pub fn new(relative_path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.relative_path
    }
}

/// Files to copy, in copy order, with their combined size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    total_size: u64,
}

impl Manifest {
    /// Build a manifest; the total size is computed once here
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        let total_size = entries
            .iter()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.size));
        Self {
            entries,
            total_size,
        }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry sizes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_size_is_sum_of_entries() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("a.txt", 10),
            ManifestEntry::new("sub/b.txt", 20),
        ]);

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.total_size(), 30);
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::new(Vec::new());
        assert!(manifest.is_empty());
        assert_eq!(manifest.total_size(), 0);
    }

    #[test]
    fn test_preserves_enumeration_order() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("z.txt", 1),
            ManifestEntry::new("a.txt", 2),
            ManifestEntry::new("m/n.txt", 3),
        ]);

        let order: Vec<&Path> = manifest.iter().map(ManifestEntry::path).collect();
        assert_eq!(
            order,
            vec![Path::new("z.txt"), Path::new("a.txt"), Path::new("m/n.txt")]
        );
    }

    #[test]
    fn test_total_size_saturates() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("huge1", u64::MAX),
            ManifestEntry::new("huge2", 5),
        ]);
        assert_eq!(manifest.total_size(), u64::MAX);
    }
}
