//! Audit trail of pipeline stage transitions.

use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Year, abbreviated month name, day, then time, e.g. `2026-Oct-18-09:15:02`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

/// Receives one marker per stage transition.
pub trait ProgressLog: Send + Sync {
    fn log(&self, message: &str);
}

/// Formats an audit line, without the trailing newline.
pub fn format_line<Tz: TimeZone>(timestamp: &DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} : {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// Appends markers to a text file, one line each.
pub struct FileProgressLog {
    path: PathBuf,
}

impl FileProgressLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileProgressLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl ProgressLog for FileProgressLog {
    fn log(&self, message: &str) {
        info!("{}", message);
        let line = format_line(&Local::now(), message);
        if let Err(e) = self.append(&line) {
            warn!(
                "Failed to append to progress log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Keeps markers in memory.
#[derive(Default)]
pub struct MemoryProgressLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages logged so far, without timestamps.
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl ProgressLog for MemoryProgressLog {
    fn log(&self, message: &str) {
        info!("{}", message);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}
