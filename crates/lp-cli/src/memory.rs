//! Long-term planner memory.
//!
//! Past sessions are summarized in `memory.json` so later runs (and the
//! `history` command) can see what was planned and how it scored. Only
//! the most recent [`HISTORY_LIMIT`] sessions are kept.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on retained history entries.
pub const HISTORY_LIMIT: usize = 100;

/// Contents of `memory.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    /// Free-form user preferences carried across sessions.
    #[serde(default)]
    pub preferences: serde_json::Map<String, Value>,
    /// Summaries of past sessions, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One completed planning session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: String,
    pub goals: Vec<String>,
    pub plan_score: f64,
    pub created_at: String,
}

/// Returns the path to memory.json under the data directory.
pub fn memory_path(data_dir: &Path) -> PathBuf {
    data_dir.join("memory.json")
}

/// Loads memory from a specific path.
///
/// A missing file is an empty memory. An unparseable file is an error.
pub fn load_memory(path: &Path) -> Result<Memory> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).context("failed to parse memory.json"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Memory::default()),
        Err(e) => Err(e).context("failed to read memory.json"),
    }
}

/// Appends a session summary, trimming history to the retention limit.
///
/// An unreadable memory file is reset rather than failing the run; the
/// plan itself already succeeded at this point.
pub fn record_history(path: &Path, entry: HistoryEntry) -> Result<()> {
    let mut memory = match load_memory(path) {
        Ok(memory) => memory,
        Err(err) => {
            tracing::warn!(error = %err, "resetting unreadable memory file");
            Memory::default()
        }
    };
    memory.history.push(entry);
    if memory.history.len() > HISTORY_LIMIT {
        let excess = memory.history.len() - HISTORY_LIMIT;
        memory.history.drain(..excess);
    }
    save_memory(path, &memory)
}

/// Writes memory to a specific path.
fn save_memory(path: &Path, memory: &Memory) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create data directory")?;
    }
    let json = serde_json::to_string_pretty(memory).context("failed to serialize memory")?;
    std::fs::write(path, json).context("failed to write memory.json")?;
    Ok(())
}
