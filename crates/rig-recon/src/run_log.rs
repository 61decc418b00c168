//! Stage log written next to the reconstruction outputs.
//!
//! Intended for auditing a run after the fact, not for resuming one.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use rig_core::{Result, RigError};
use serde::{Deserialize, Serialize};

/// One driver stage and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix timestamp of the stage end (seconds since epoch).
    pub timestamp: u64,

    /// Stage name (e.g. "match_photos", "build_texture").
    pub operation: String,

    pub success: bool,

    /// Optional notes or error message.
    pub notes: Option<String>,
}

impl LogEntry {
    pub fn success(operation: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            operation: operation.into(),
            success: true,
            notes: None,
        }
    }

    pub fn success_with_notes(operation: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::success(operation)
        }
    }

    pub fn failure(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            operation: operation.into(),
            success: false,
            notes: Some(error.into()),
        }
    }
}

/// Full record of a reconstruction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunLog {
    pub started_at: u64,
    pub finished_at: Option<u64>,
    /// Whether pre-calibrated poses were injected.
    pub precalibrated: bool,
    pub images: Vec<PathBuf>,
    pub entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new(precalibrated: bool) -> Self {
        Self {
            started_at: current_timestamp(),
            precalibrated,
            ..Self::default()
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(current_timestamp());
    }

    /// Whether every recorded stage succeeded.
    pub fn succeeded(&self) -> bool {
        self.entries.iter().all(|e| e.success)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| RigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| RigError::io(path, e))
    }
}

/// Current Unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `HH:MM:SS`, hours not wrapped at 24.
pub fn format_hms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
