//! Terminal progress rendering for the CLI

use crate::executor::CopySummary;
use crate::types::ProgressSnapshot;
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// Progress bar fed by [`ProgressSnapshot`]s
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {percent:>3}% | {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message("Starting copy...".to_string());

        Self { bar }
    }

    /// Create a display that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Refresh the bar from a snapshot.
    pub fn update(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_length(snapshot.total_bytes);
        self.bar
            .set_position(snapshot.transferred_bytes.min(snapshot.total_bytes));
        self.bar.set_message(format_snapshot(snapshot));
    }

    /// Finalize after a successful copy.
    pub fn finish(&self, summary: &CopySummary) {
        self.bar.finish_and_clear();
        println!("{}", format_summary(summary));
    }

    /// Leave the bar in place and print the failure.
    pub fn abandon(&self, err: &str) {
        self.bar
            .abandon_with_message(format!("{} {}", style("ERROR").red().bold(), err));
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn format_snapshot(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{}/{} | {}/s | ETA {}",
        HumanBytes(snapshot.transferred_bytes),
        HumanBytes(snapshot.total_bytes),
        HumanBytes(snapshot.instant_speed_bytes_per_sec as u64),
        snapshot.human_eta
    )
}

fn format_summary(summary: &CopySummary) -> String {
    let secs = summary.elapsed.as_secs_f64();
    let throughput = if secs > 0.0 {
        (summary.bytes_copied as f64 / secs) as u64
    } else {
        0
    };
    format!(
        "{} {} file(s) | {} | {:.1}s | {}/s",
        style("Copied").green().bold(),
        summary.files_copied,
        HumanBytes(summary.bytes_copied),
        secs,
        HumanBytes(throughput)
    )
}
