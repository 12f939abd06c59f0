//! Main copy command

use crate::config::{Config, OutputMode};
use crate::executor::{copy, CopySummary};
use crate::types::{CopyError, ProgressSnapshot};
use crate::ui::ProgressDisplay;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Run the copy and render progress according to `output`
pub fn run(config: &Config, output: OutputMode) -> Result<CopySummary, CopyError> {
    match output {
        OutputMode::Quiet => copy(config, None),
        OutputMode::Json => {
            let stdout_closed = AtomicBool::new(false);
            let callback = |snapshot: &ProgressSnapshot| {
                if stdout_closed.load(Ordering::Relaxed) {
                    return;
                }
                if let Err(e) = write_json_line(&mut std::io::stdout().lock(), snapshot) {
                    tracing::debug!("Stopping JSON progress output: {}", e);
                    stdout_closed.store(true, Ordering::Relaxed);
                }
            };
            copy(config, Some(&callback))
        }
        OutputMode::Bar => {
            let display = ProgressDisplay::new();
            let callback = |snapshot: &ProgressSnapshot| display.update(snapshot);
            let result = copy(config, Some(&callback));
            match &result {
                Ok(summary) => display.finish(summary),
                Err(e) => display.abandon(&e.to_string()),
            }
            result
        }
    }
}

fn write_json_line(out: &mut impl Write, snapshot: &ProgressSnapshot) -> io::Result<()> {
    let line = serde_json::to_string(snapshot).map_err(io::Error::other)?;
    writeln!(out, "{}", line)?;
    out.flush()
}
