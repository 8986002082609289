//! Batch bookkeeping: the session log ring and per-batch reports.

use std::collections::VecDeque;
use std::time::Duration;

/// Most-recent entries retained in the session log.
pub const LOG_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Success,
    Failure,
}

/// One per-file line in the session log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub outcome: LogOutcome,
    pub source_name: String,
    /// Name written next to the source; absent when the attempt failed
    /// before a target name was produced.
    pub derived_name: Option<String>,
    /// Output size for successes, human-readable reason for failures.
    pub detail: String,
}

impl LogEntry {
    pub fn success(source_name: String, derived_name: String, detail: String) -> Self {
        Self {
            outcome: LogOutcome::Success,
            source_name,
            derived_name: Some(derived_name),
            detail,
        }
    }

    pub fn failure(source_name: String, detail: String) -> Self {
        Self {
            outcome: LogOutcome::Failure,
            source_name,
            derived_name: None,
            detail,
        }
    }
}

/// Newest-first log bounded to [`LOG_CAPACITY`] entries.
///
/// The log is the durable record of per-file outcomes for the current
/// session only; it is never persisted.
#[derive(Debug, Default)]
pub struct ConversionLog {
    entries: VecDeque<LogEntry>,
}

impl ConversionLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(LOG_CAPACITY);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Terminal state reached by one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing in the inventory matched the direction's source suffix.
    NoTargets,
    /// Read-write access was refused; no files were touched.
    Denied,
    /// Every matched entry was attempted.
    Completed,
}

/// Summary of one `convert` invocation.
#[derive(Debug)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub attempted: usize,
    pub converted: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchReport {
    pub(crate) fn terminal(outcome: BatchOutcome, elapsed: Duration) -> Self {
        Self {
            outcome,
            attempted: 0,
            converted: 0,
            failed: 0,
            elapsed,
        }
    }
}
