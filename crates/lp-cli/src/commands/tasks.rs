//! Tasks command for listing stored task proposals.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use lp_db::TaskStore;

use crate::Config;

#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Only show tasks with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Only show tasks with this priority
    #[arg(long)]
    pub priority: Option<String>,

    /// Maximum number of tasks to show
    #[arg(long, default_value_t = 100)]
    pub limit: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &TasksArgs, config: &Config) -> Result<()> {
    let store = TaskStore::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let tasks = store.query_tasks(args.status.as_deref(), args.priority.as_deref(), args.limit)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&tasks)?)?;
        return Ok(());
    }

    if tasks.is_empty() {
        writeln!(writer, "No stored tasks.")?;
        return Ok(());
    }

    writeln!(writer, "Stored tasks:")?;
    for task in tasks {
        writeln!(
            writer,
            "- #{} [{}] {} ({} min, {} priority, {})",
            task.id,
            task.status,
            task.title,
            task.duration_minutes,
            task.priority,
            task.preferred_time_block
        )?;
    }

    Ok(())
}
