//! Command-line arguments

use super::{Config, ConfigFile, TransferMode};
use crate::types::CopyError;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// How the CLI renders progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Bar,
    Json,
    Quiet,
}

/// Copy files matching glob patterns from one directory tree to another
#[derive(Debug, Parser)]
#[command(name = "globcopy", version, about)]
pub struct Cli {
    /// Source directory
    pub source: Option<PathBuf>,

    /// Destination directory (created if missing)
    pub destination: Option<PathBuf>,

    /// Glob pattern relative to SOURCE; repeatable, `!` prefix excludes [default: **/*]
    #[arg(short = 'g', long = "glob", value_name = "PATTERN")]
    pub globs: Vec<String>,

    /// Exclude paths matching PATTERN; repeatable
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Maximum depth of matched files (1 = files directly in SOURCE)
    #[arg(short = 'd', long)]
    pub deep: Option<usize>,

    /// Match hidden files and directories
    #[arg(long)]
    pub dot: bool,

    #[arg(long)]
    pub case_insensitive: bool,

    /// Do not follow symlinks
    #[arg(long)]
    pub no_follow: bool,

    /// Honor .gitignore and .ignore files
    #[arg(long)]
    pub gitignore: bool,

    /// Skip unreadable entries instead of failing
    #[arg(long)]
    pub suppress_errors: bool,

    /// Number of files copied concurrently (1 = sequential)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Read settings from a TOML file; command-line flags take precedence
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print one JSON progress snapshot per line
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Bar
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = CopyError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut config = Config::default();
        if let Some(path) = &cli.config {
            config.apply_file(ConfigFile::load(path)?);
        }

        if let Some(source) = cli.source {
            config.source = source;
        }
        if let Some(destination) = cli.destination {
            config.destination = destination;
        }
        if config.source.as_os_str().is_empty() || config.destination.as_os_str().is_empty() {
            return Err(CopyError::Config(
                "SOURCE and DESTINATION are required (on the command line or in --config)"
                    .to_string(),
            ));
        }

        if !cli.globs.is_empty() {
            config.patterns = cli.globs;
        }
        if !cli.ignore.is_empty() {
            config.options.ignore = cli.ignore;
        }
        if cli.deep.is_some() {
            config.options.deep = cli.deep;
        }
        if cli.dot {
            config.options.dot = true;
        }
        if cli.case_insensitive {
            config.options.case_sensitive = false;
        }
        if cli.no_follow {
            config.options.follow_symlinks = false;
        }
        if cli.gitignore {
            config.options.git_ignore = true;
        }
        if cli.suppress_errors {
            config.options.suppress_errors = true;
        }
        if let Some(jobs) = cli.jobs {
            if jobs == 0 {
                return Err(CopyError::Config("--jobs must be at least 1".to_string()));
            }
            config.mode = TransferMode::from_jobs(jobs);
        }

        config.validate()?;
        Ok(config)
    }
}
