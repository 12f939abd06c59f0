//! Terminal UI

mod progress;

pub use progress::ProgressDisplay;
