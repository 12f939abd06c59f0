//! Core type definitions for globcopy

mod error;
mod manifest;
mod progress;

pub use error::{CopyError, CopyStage};
pub use manifest::{Manifest, ManifestEntry};
pub use progress::{format_eta, Eta, ProgressSnapshot};
