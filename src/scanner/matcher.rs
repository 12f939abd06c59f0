//! Glob matching against a directory tree

use crate::types::CopyError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pattern used when the caller supplies none
pub const DEFAULT_PATTERN: &str = "**/*";

/// Matcher configuration, forwarded unchanged from the caller to the [`Matcher`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Exclusion globs relative to the root; excluded directories are not descended
    pub ignore: Vec<String>,

    /// Maximum path depth of a match (`a.txt` = 1, `sub/b.txt` = 2)
    pub deep: Option<usize>,

    /// Match entries whose name starts with `.`
    pub dot: bool,

    pub case_sensitive: bool,

    /// Follow symlinks to files and directories
    pub follow_symlinks: bool,

    /// Honor `.gitignore` and `.ignore` files
    pub git_ignore: bool,

    /// Log traversal errors and keep going instead of failing
    pub suppress_errors: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            deep: None,
            dot: false,
            case_sensitive: true,
            follow_symlinks: true,
            git_ignore: false,
            suppress_errors: false,
        }
    }
}

/// A file found by a [`Matcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub relative_path: PathBuf,
    /// `None` when the size could not be read
    pub size: Option<u64>,
}

/// Resolves glob patterns under a root into regular files
pub trait Matcher {
    fn matches(
        &self,
        root: &Path,
        patterns: &[String],
        options: &MatchOptions,
    ) -> Result<Vec<MatchedFile>, CopyError>;
}

/// Default [`Matcher`] built on the `ignore` walker and `globset`
///
/// `*` never crosses a `/`; `**` spans any number of directories. Patterns
/// starting with `!` are treated as exclusions.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl Matcher for GlobMatcher {
    fn matches(
        &self,
        root: &Path,
        patterns: &[String],
        options: &MatchOptions,
    ) -> Result<Vec<MatchedFile>, CopyError> {
        let mut includes = Vec::new();
        let mut excludes: Vec<&str> = options.ignore.iter().map(String::as_str).collect();
        for pattern in patterns {
            match pattern.strip_prefix('!') {
                Some(negated) => excludes.push(negated),
                None => includes.push(pattern.as_str()),
            }
        }
        if includes.is_empty() {
            includes.push(DEFAULT_PATTERN);
        }

        let include_set = compile_patterns(&includes, options.case_sensitive)?;
        let exclude_set = compile_patterns(&excludes, options.case_sensitive)?;

        let filter_root = root.to_path_buf();
        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!options.dot)
            .follow_links(options.follow_symlinks)
            .max_depth(options.deep);
        if options.git_ignore {
            builder.git_ignore(true).ignore(true).require_git(false);
        }
        builder.filter_entry(move |entry| match entry.path().strip_prefix(&filter_root) {
            Ok(relative) if relative.as_os_str().is_empty() => true,
            Ok(relative) => !exclude_set.is_match(relative),
            Err(_) => true,
        });

        let mut matched = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) if options.suppress_errors => {
                    tracing::warn!("Skipping unreadable entry during traversal: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(CopyError::enumeration(format!(
                        "traversal of {} failed: {}",
                        root.display(),
                        e
                    )))
                }
            };

            let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(root) {
                Ok(p) => p.to_path_buf(),
                Err(_) => {
                    tracing::warn!(
                        "Skipping {}: not under the source root",
                        entry.path().display()
                    );
                    continue;
                }
            };

            if !include_set.is_match(&relative_path) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => Some(metadata.len()),
                Err(e) => {
                    tracing::warn!(
                        "Failed to read size of {}: {}",
                        entry.path().display(),
                        e
                    );
                    None
                }
            };

            matched.push(MatchedFile {
                relative_path,
                size,
            });
        }

        Ok(matched)
    }
}

/// Compile glob patterns into a single set
pub fn compile_patterns(patterns: &[&str], case_sensitive: bool) -> Result<GlobSet, CopyError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = pattern.strip_prefix("./").unwrap_or(pattern);
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| {
                CopyError::enumeration(format!("invalid pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| CopyError::enumeration(format!("failed to build pattern set: {}", e)))
}
