//! # globcopy - glob-driven directory copy with live progress
//!
//! Selects files under a source directory with glob patterns, copies them
//! one by one into a destination tree, and periodically reports aggregate
//! progress (percentage, throughput, ETA) to an observer.
//!
//! ```no_run
//! use globcopy::{copy, Config, ProgressSnapshot};
//!
//! let config = Config::new("/data/in", "/data/out").with_patterns(["**/*.bin"]);
//! let on_progress = |p: &ProgressSnapshot| println!("{:.1}% ETA {}", p.percentage, p.human_eta);
//! copy(&config, Some(&on_progress))?;
//! # Ok::<(), globcopy::CopyError>(())
//! ```

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, TransferMode};
pub use executor::{copy, copy_with_matcher, CopySummary, ProgressCallback};
pub use scanner::{GlobMatcher, MatchOptions, Matcher};
pub use types::{CopyError, CopyStage, Eta, Manifest, ManifestEntry, ProgressSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
