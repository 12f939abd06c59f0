//! Configuration management

mod cli;

pub use cli::{Cli, OutputMode};

use crate::scanner::{MatchOptions, DEFAULT_PATTERN};
use crate::types::CopyError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How manifest entries are transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// One file at a time, in manifest order
    #[default]
    Sequential,
    /// Several files at once; completion order is not guaranteed
    Parallel { workers: usize },
}

impl TransferMode {
    /// `jobs <= 1` selects sequential mode
    pub fn from_jobs(jobs: usize) -> Self {
        if jobs <= 1 {
            TransferMode::Sequential
        } else {
            TransferMode::Parallel { workers: jobs }
        }
    }
}

/// Everything one copy run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source directory (must exist)
    pub source: PathBuf,

    /// Destination directory (created if missing)
    pub destination: PathBuf,

    /// Glob patterns relative to `source`; `!`-prefixed patterns exclude
    pub patterns: Vec<String>,

    /// Matcher options
    pub options: MatchOptions,

    pub mode: TransferMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            options: MatchOptions::default(),
            mode: TransferMode::Sequential,
        }
    }
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate configuration
    ///
    /// Path existence is not checked here; the copy pipeline does that.
    pub fn validate(&self) -> Result<(), CopyError> {
        if self.source.as_os_str().is_empty() {
            return Err(CopyError::Config("Source path is empty".to_string()));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(CopyError::Config("Destination path is empty".to_string()));
        }

        // Copying a tree onto itself would truncate each file before reading it
        if self.source == self.destination {
            return Err(CopyError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        if let TransferMode::Parallel { workers: 0 } = self.mode {
            return Err(CopyError::Config(
                "Parallel mode needs at least one worker".to_string(),
            ));
        }

        Ok(())
    }

    /// Overlay values from a config file onto this config
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(source) = file.source {
            self.source = source;
        }
        if let Some(destination) = file.destination {
            self.destination = destination;
        }
        if !file.patterns.is_empty() {
            self.patterns = file.patterns;
        }
        if let Some(jobs) = file.jobs {
            self.mode = TransferMode::from_jobs(jobs);
        }
        self.options = file.options;
    }
}

/// On-disk TOML configuration; every field is optional
///
/// ```toml
/// source = "/data/in"
/// destination = "/data/out"
/// patterns = ["**/*.bin"]
/// jobs = 4
///
/// [options]
/// deep = 2
/// ignore = ["tmp/**"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub jobs: Option<usize>,
    pub options: MatchOptions,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self, CopyError> {
        toml::from_str(contents)
            .map_err(|e| CopyError::Config(format!("Invalid config file: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, CopyError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CopyError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }
}
