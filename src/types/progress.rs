//! Progress snapshots delivered to observers

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Estimated time remaining
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Eta {
    Seconds(f64),
    /// No throughput observed yet, so no estimate is possible
    Unknown,
}

impl Eta {
    pub fn as_secs(&self) -> Option<f64> {
        match self {
            Eta::Seconds(secs) => Some(*secs),
            Eta::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Eta::Unknown)
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Seconds(secs) => f.write_str(&format_eta(*secs)),
            Eta::Unknown => f.write_str("--:--"),
        }
    }
}

/// Point-in-time view of an in-progress copy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// `100 * transferred / total`; may exceed 100 if files grew after enumeration
    pub percentage: f64,
    pub transferred_bytes: u64,
    pub total_bytes: u64,
    /// Average throughput since the run started
    pub speed_bytes_per_sec: f64,
    /// Throughput since the previous snapshot
    pub instant_speed_bytes_per_sec: f64,
    pub eta: Eta,
    pub human_eta: String,
}

impl ProgressSnapshot {
    /// Compute a snapshot from run totals.
    ///
    /// An empty run (`total == 0`) reports 100% with zero speed and zero ETA.
    /// Zero throughput yields [`Eta::Unknown`] rather than an infinite value.
    pub fn compute(total: u64, transferred: u64, elapsed: Duration) -> Self {
        if total == 0 {
            return Self {
                percentage: 100.0,
                transferred_bytes: transferred,
                total_bytes: 0,
                speed_bytes_per_sec: 0.0,
                instant_speed_bytes_per_sec: 0.0,
                eta: Eta::Seconds(0.0),
                human_eta: format_eta(0.0),
            };
        }

        let percentage = transferred as f64 / total as f64 * 100.0;
        let secs = elapsed.as_secs_f64();
        let speed = if secs > 0.0 {
            transferred as f64 / secs
        } else {
            0.0
        };

        let remaining = total.saturating_sub(transferred);
        let eta = if remaining == 0 {
            Eta::Seconds(0.0)
        } else if speed > 0.0 {
            Eta::Seconds(remaining as f64 / speed)
        } else {
            Eta::Unknown
        };

        Self {
            percentage,
            transferred_bytes: transferred,
            total_bytes: total,
            speed_bytes_per_sec: speed,
            instant_speed_bytes_per_sec: speed,
            human_eta: eta.to_string(),
            eta,
        }
    }

    /// Replace the instantaneous speed with one measured over a tick window
    pub fn with_instant_speed(mut self, bytes: u64, window: Duration) -> Self {
        if self.total_bytes == 0 {
            return self;
        }
        let secs = window.as_secs_f64();
        self.instant_speed_bytes_per_sec = if secs > 0.0 {
            bytes as f64 / secs
        } else {
            0.0
        };
        self
    }
}

/// Format seconds as `HH:MM:SS` when at least an hour remains, else `MM:SS`
pub fn format_eta(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.round() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_reports_complete() {
        let snapshot = ProgressSnapshot::compute(0, 0, Duration::from_secs(3));

        assert_eq!(snapshot.percentage, 100.0);
        assert_eq!(snapshot.speed_bytes_per_sec, 0.0);
        assert_eq!(snapshot.eta, Eta::Seconds(0.0));
        assert_eq!(snapshot.human_eta, "00:00");
    }

    #[test]
    fn test_zero_elapsed_has_unknown_eta() {
        let snapshot = ProgressSnapshot::compute(100, 0, Duration::ZERO);

        assert_eq!(snapshot.percentage, 0.0);
        assert_eq!(snapshot.speed_bytes_per_sec, 0.0);
        assert!(snapshot.eta.is_unknown());
        assert_eq!(snapshot.human_eta, "--:--");
        assert!(!snapshot.percentage.is_nan());
    }

    #[test]
    fn test_average_speed_and_eta() {
        let snapshot = ProgressSnapshot::compute(1000, 250, Duration::from_secs(5));

        assert_eq!(snapshot.percentage, 25.0);
        assert_eq!(snapshot.speed_bytes_per_sec, 50.0);
        assert_eq!(snapshot.eta.as_secs(), Some(15.0));
        assert_eq!(snapshot.human_eta, "00:15");
    }

    #[test]
    fn test_overshoot_clamps_remaining() {
        let snapshot = ProgressSnapshot::compute(100, 120, Duration::from_secs(1));

        assert!(snapshot.percentage > 100.0);
        assert_eq!(snapshot.eta, Eta::Seconds(0.0));
    }

    #[test]
    fn test_instant_speed_window() {
        let snapshot = ProgressSnapshot::compute(1000, 500, Duration::from_secs(10))
            .with_instant_speed(200, Duration::from_millis(500));

        assert_eq!(snapshot.speed_bytes_per_sec, 50.0);
        assert_eq!(snapshot.instant_speed_bytes_per_sec, 400.0);

        let stalled = snapshot.with_instant_speed(10, Duration::ZERO);
        assert_eq!(stalled.instant_speed_bytes_per_sec, 0.0);
    }

    #[test]
    fn test_format_eta_minutes_and_seconds() {
        assert_eq!(format_eta(0.0), "00:00");
        assert_eq!(format_eta(7.4), "00:07");
        assert_eq!(format_eta(59.6), "01:00");
        assert_eq!(format_eta(754.0), "12:34");
    }

    #[test]
    fn test_format_eta_with_hours() {
        assert_eq!(format_eta(3600.0), "01:00:00");
        assert_eq!(format_eta(3725.0), "01:02:05");
        assert_eq!(format_eta(100.0 * 3600.0), "100:00:00");
    }

    #[test]
    fn test_format_eta_degenerate_inputs() {
        assert_eq!(format_eta(f64::NAN), "00:00");
        assert_eq!(format_eta(f64::INFINITY), "00:00");
        assert_eq!(format_eta(-3.0), "00:00");
    }

    #[test]
    fn test_snapshot_serializes_unknown_eta_as_null() {
        let snapshot = ProgressSnapshot::compute(10, 0, Duration::ZERO);
        let json = serde_json::to_value(&snapshot).expect("serialize snapshot");

        assert!(json["eta"].is_null());
        assert_eq!(json["human_eta"], "--:--");
        assert_eq!(json["total_bytes"], 10);
    }
}
