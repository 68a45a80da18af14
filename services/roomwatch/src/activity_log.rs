//! Append-only activity log

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::check::Availability;

/// One line of the activity log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub label: String,
    pub status: Availability,
    pub notified: bool,
}

impl LogEntry {
    pub fn now(label: impl Into<String>, status: Availability, notified: bool) -> Self {
        Self {
            timestamp: Local::now(),
            label: label.into(),
            status,
            notified,
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{} - Label: {}, Status: {}, Notification: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.label,
            self.status,
            if self.notified { "sent" } else { "not sent" }
        )
    }
}

/// Text file that only ever grows by one line per checked target
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }
}
