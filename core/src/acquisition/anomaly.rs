use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Advisory raised when a cycle's dtt exceeds the configured ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighDttEvent {
    pub timestamp: DateTime<Local>,
    pub peak_dtt: f64,
    pub max_dtt: f64,
}

impl HighDttEvent {
    pub fn new(peak_dtt: f64, max_dtt: f64) -> Self {
        Self {
            timestamp: Local::now(),
            peak_dtt,
            max_dtt,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "High dtt! {} (peak {:.4} > {:.4})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.peak_dtt,
            self.max_dtt
        )
    }
}
