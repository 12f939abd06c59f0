//! Build the transfer manifest from glob patterns

use super::matcher::{MatchOptions, Matcher, DEFAULT_PATTERN};
use crate::types::{CopyError, Manifest, ManifestEntry};
use std::path::Path;

/// Resolve `patterns` under `source_root` into a [`Manifest`]
///
/// An empty pattern list selects every file recursively. The matcher's
/// order is kept as copy order. Matches without a readable size count as
/// zero bytes.
///
/// # Errors
/// * `CopyError::Enumeration` if a pattern is invalid or traversal fails
pub fn enumerate(
    source_root: &Path,
    patterns: &[String],
    options: &MatchOptions,
    matcher: &dyn Matcher,
) -> Result<Manifest, CopyError> {
    let default_patterns;
    let patterns: &[String] = if patterns.is_empty() {
        default_patterns = vec![DEFAULT_PATTERN.to_string()];
        &default_patterns
    } else {
        patterns
    };

    let matched = matcher.matches(source_root, patterns, options)?;

    let entries: Vec<ManifestEntry> = matched
        .into_iter()
        .map(|file| {
            let size = file.size.unwrap_or_else(|| {
                tracing::warn!(
                    "No size available for {}, counting it as 0 bytes",
                    file.relative_path.display()
                );
                0
            });
            ManifestEntry::new(file.relative_path, size)
        })
        .collect();

    let manifest = Manifest::new(entries);
    tracing::info!(
        files = manifest.len(),
        bytes = manifest.total_size(),
        "Enumerated {}",
        source_root.display()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::matcher::{GlobMatcher, MatchedFile};
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Matcher returning a fixed list and recording what it was asked
    struct FixedMatcher {
        files: Vec<MatchedFile>,
        seen_patterns: RefCell<Vec<String>>,
    }

    impl Matcher for FixedMatcher {
        fn matches(
            &self,
            _root: &Path,
            patterns: &[String],
            _options: &MatchOptions,
        ) -> Result<Vec<MatchedFile>, CopyError> {
            self.seen_patterns.borrow_mut().extend_from_slice(patterns);
            Ok(self.files.clone())
        }
    }

    #[test]
    fn test_empty_patterns_use_default() {
        let matcher = FixedMatcher {
            files: Vec::new(),
            seen_patterns: RefCell::new(Vec::new()),
        };

        let manifest = enumerate(Path::new("/src"), &[], &MatchOptions::default(), &matcher)
            .expect("enumerate should succeed");

        assert!(manifest.is_empty());
        assert_eq!(
            *matcher.seen_patterns.borrow(),
            vec![DEFAULT_PATTERN.to_string()]
        );
    }

    #[test]
    fn test_missing_size_counts_as_zero_and_keeps_order() {
        let matcher = FixedMatcher {
            files: vec![
                MatchedFile {
                    relative_path: PathBuf::from("z.dat"),
                    size: Some(7),
                },
                MatchedFile {
                    relative_path: PathBuf::from("a.dat"),
                    size: None,
                },
            ],
            seen_patterns: RefCell::new(Vec::new()),
        };

        let manifest = enumerate(
            Path::new("/src"),
            &["*.dat".to_string()],
            &MatchOptions::default(),
            &matcher,
        )
        .expect("enumerate should succeed");

        assert_eq!(manifest.total_size(), 7);
        assert_eq!(manifest.entries()[0], ManifestEntry::new("z.dat", 7));
        assert_eq!(manifest.entries()[1], ManifestEntry::new("a.dat", 0));
    }

    #[test]
    fn test_directories_are_never_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("empty/nested")).expect("create dirs");
        fs::write(root.join("a.txt"), vec![b'a'; 10]).expect("write a.txt");
        fs::create_dir(root.join("sub")).expect("create sub");
        fs::write(root.join("sub/b.txt"), vec![b'b'; 20]).expect("write b.txt");

        let manifest = enumerate(root, &[], &MatchOptions::default(), &GlobMatcher)
            .expect("enumerate should succeed");

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.total_size(), 30);
        assert!(manifest
            .iter()
            .all(|entry| root.join(&entry.relative_path).is_file()));
    }

    #[test]
    fn test_depth_one_bin_glob() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir(root.join("deep")).expect("create deep");
        fs::write(root.join("x.bin"), b"xx").expect("write x.bin");
        fs::write(root.join("deep/y.bin"), b"yy").expect("write y.bin");

        let options = MatchOptions {
            deep: Some(1),
            ..MatchOptions::default()
        };
        let manifest = enumerate(root, &["**/*.bin".to_string()], &options, &GlobMatcher)
            .expect("enumerate should succeed");

        assert_eq!(manifest.entries(), &[ManifestEntry::new("x.bin", 2)]);
    }
}
