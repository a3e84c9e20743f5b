//! Run history collected in memory and written once.
//!
//! Every line of a run carries the same timestamp: the moment the log was
//! created. [`HistoryLog::flush`] prepends the run's lines to the history
//! file, so the newest run is always at the top.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::document::{DocumentStore, FileDocumentStore};
use crate::error::{StoreError, StoreResult};

const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Collector for the lines of one run.
#[derive(Clone, Debug)]
pub struct HistoryLog {
    timestamp: String,
    lines: Vec<String>,
}

impl HistoryLog {
    /// Start a log stamped with the current time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Start a log stamped with `at`.
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            lines: Vec::new(),
        }
    }

    /// Record one message. It is also emitted as a tracing event.
    pub fn record(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("{message}");
        self.lines.push(format!("[{}] {message}", self.timestamp));
    }

    /// Recorded lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Prepend the recorded lines and a blank line to the file at `path`.
    ///
    /// The file is created if it does not exist. Consumes the log so a run
    /// can only be flushed once. An empty log leaves the file untouched.
    pub fn flush(self, path: &Path) -> StoreResult<()> {
        if self.lines.is_empty() {
            return Ok(());
        }

        let file = FileDocumentStore::new(path);
        let previous = match file.read() {
            Ok(text) => text,
            Err(StoreError::NotFound(_)) => String::new(),
            Err(e) => return Err(e),
        };

        let mut contents = self.lines.join("\n");
        contents.push_str("\n\n");
        contents.push_str(&previous);
        file.write(&contents)
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
