//! JSON output for scripting and GUI integration
//!
//! When the --json flag is enabled, scan results and per-file outcomes are
//! emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};

use crate::conversion::batch::{LogEntry, LogOutcome};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Inventory counts after a scan
    Scan {
        total: usize,
        png_count: usize,
        webp_count: usize,
    },
    /// One file converted
    Converted {
        source: String,
        target: String,
        size: String,
    },
    /// One file failed
    Failed { source: String, error: String },
    /// Batch summary
    Summary {
        attempted: usize,
        converted: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit the message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Build the per-entry message for a conversion log line
    pub fn from_log_entry(entry: &LogEntry) -> Self {
        match entry.outcome {
            LogOutcome::Success => Self::Converted {
                source: entry.source_name.clone(),
                target: entry.derived_name.clone().unwrap_or_default(),
                size: entry.detail.clone(),
            },
            LogOutcome::Failure => Self::Failed {
                source: entry.source_name.clone(),
                error: entry.detail.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_tagged() {
        let json = serde_json::to_string(&JsonMessage::Scan {
            total: 3,
            png_count: 2,
            webp_count: 1,
        })
        .unwrap();
        assert!(json.contains(r#""type":"scan""#));
        assert!(json.contains(r#""png_count":2"#));
    }

    #[test]
    fn test_log_entry_mapping() {
        let success = LogEntry::success("a.png".into(), "a.webp".into(), "1.2 KB".into());
        match JsonMessage::from_log_entry(&success) {
            JsonMessage::Converted { source, target, size } => {
                assert_eq!(source, "a.png");
                assert_eq!(target, "a.webp");
                assert_eq!(size, "1.2 KB");
            }
            other => panic!("unexpected message: {:?}", other),
        }

        let failure = LogEntry::failure("b.png".into(), "corrupt".into());
        match JsonMessage::from_log_entry(&failure) {
            JsonMessage::Failed { source, error } => {
                assert_eq!(source, "b.png");
                assert_eq!(error, "corrupt");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
