//! History command for listing past planning sessions.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::Config;
use crate::memory::{self, HistoryEntry};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of sessions to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &HistoryArgs, config: &Config) -> Result<()> {
    let memory = memory::load_memory(&memory::memory_path(&config.data_dir))?;
    let entries: Vec<&HistoryEntry> = memory.history.iter().rev().take(args.limit).collect();

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No planning history.")?;
        return Ok(());
    }

    writeln!(writer, "Recent sessions:")?;
    for entry in entries {
        writeln!(
            writer,
            "- {}  score {:.2}  goals: {}  ({})",
            entry.created_at,
            entry.plan_score,
            entry.goals.join(", "),
            entry.session_id
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn seeded_config(dir: &std::path::Path) -> Config {
        let config = Config {
            api_key: None,
            model: "unused".to_string(),
            database_path: dir.join("lp.db"),
            data_dir: dir.to_path_buf(),
        };
        let path = memory::memory_path(&config.data_dir);
        memory::record_history(
            &path,
            HistoryEntry {
                session_id: "s1".to_string(),
                goals: vec!["work".to_string()],
                plan_score: 100.0,
                created_at: "2024-01-15T10:00:00.000Z".to_string(),
            },
        )
        .unwrap();
        memory::record_history(
            &path,
            HistoryEntry {
                session_id: "s2".to_string(),
                goals: vec!["meals".to_string(), "exercise".to_string()],
                plan_score: 75.5,
                created_at: "2024-01-16T09:30:00.000Z".to_string(),
            },
        )
        .unwrap();
        config
    }

    #[test]
    fn history_lists_newest_sessions_first() {
        let temp = tempfile::tempdir().unwrap();
        let config = seeded_config(temp.path());

        let mut output = Vec::new();
        run(&mut output, &HistoryArgs { limit: 10, json: false }, &config).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        Recent sessions:
        - 2024-01-16T09:30:00.000Z  score 75.50  goals: meals, exercise  (s2)
        - 2024-01-15T10:00:00.000Z  score 100.00  goals: work  (s1)
        ");
    }

    #[test]
    fn history_respects_the_limit() {
        let temp = tempfile::tempdir().unwrap();
        let config = seeded_config(temp.path());

        let mut output = Vec::new();
        run(&mut output, &HistoryArgs { limit: 1, json: false }, &config).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("s2"));
        assert!(!output.contains("s1"));
    }

    #[test]
    fn history_json_output_is_newest_first() {
        let temp = tempfile::tempdir().unwrap();
        let config = seeded_config(temp.path());

        let mut output = Vec::new();
        run(&mut output, &HistoryArgs { limit: 10, json: true }, &config).unwrap();

        let entries: Vec<serde_json::Value> = serde_json::from_slice(&output).unwrap();
        assert_eq!(entries[0]["session_id"], "s2");
        assert_eq!(entries[1]["session_id"], "s1");
    }

    #[test]
    fn history_empty_memory_prints_placeholder() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            api_key: None,
            model: "unused".to_string(),
            database_path: temp.path().join("lp.db"),
            data_dir: temp.path().to_path_buf(),
        };

        let mut output = Vec::new();
        run(&mut output, &HistoryArgs { limit: 10, json: false }, &config).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No planning history.\n");
    }
}
