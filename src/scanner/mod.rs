//! File selection: glob matching and manifest building

mod enumerate;
mod matcher;

pub use enumerate::enumerate;
pub use matcher::{compile_patterns, GlobMatcher, MatchOptions, MatchedFile, Matcher, DEFAULT_PATTERN};
