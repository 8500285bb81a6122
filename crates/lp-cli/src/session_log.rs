//! Per-session JSONL trace files.
//!
//! Every pipeline run appends stage records to
//! `<data_dir>/logs/<session_id>.jsonl`. Logging is best-effort: a
//! failed write warns and the run continues.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

/// Append-only trace for one planning session.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    session_id: String,
}

impl SessionLog {
    /// Opens the log for a session, creating the logs directory.
    pub fn create(data_dir: &Path, session_id: String) -> Self {
        let logs_dir = data_dir.join("logs");
        if let Err(err) = std::fs::create_dir_all(&logs_dir) {
            tracing::warn!(error = %err, "failed to create session log directory");
        }
        let path = logs_dir.join(format!("{session_id}.jsonl"));
        Self { path, session_id }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Appends one record. Failures are logged, never fatal.
    pub fn record(&self, stage: &str, action: &str, data: Value) {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "session_id": self.session_id,
            "stage": stage,
            "action": action,
            "data": data,
        });
        if let Err(err) = self.append(&entry) {
            tracing::warn!(error = %err, "failed to write session log entry");
        }
    }

    fn append(&self, entry: &Value) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::create(dir.path(), "abc123".to_string());
        log.record("intent", "extracted", json!({"goals": ["work"]}));
        log.record("budget", "estimated", json!({"total": 17.2}));

        let content = std::fs::read_to_string(dir.path().join("logs/abc123.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["session_id"], "abc123");
        assert_eq!(first["stage"], "intent");
        assert_eq!(first["action"], "extracted");
        assert_eq!(first["data"]["goals"][0], "work");
        assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_records_from_two_runs_interleave_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = SessionLog::create(dir.path(), "s1".to_string());
        first.record("pipeline", "started", json!({}));
        let second = SessionLog::create(dir.path(), "s1".to_string());
        second.record("pipeline", "completed", json!({}));

        let content = std::fs::read_to_string(dir.path().join("logs/s1.jsonl")).unwrap();
        let actions: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(actions[0]["action"], "started");
        assert_eq!(actions[1]["action"], "completed");
    }

    #[test]
    fn test_record_survives_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the logs directory should be makes every append fail.
        std::fs::write(dir.path().join("logs"), "blocker").unwrap();
        let log = SessionLog::create(dir.path(), "abc123".to_string());
        log.record("intent", "extracted", json!({}));
        assert!(!dir.path().join("logs").join("abc123.jsonl").exists());
    }
}
