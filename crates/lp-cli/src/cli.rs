//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::history::HistoryArgs;
use crate::commands::plan::PlanArgs;
use crate::commands::tasks::TasksArgs;

/// Deterministic weekly life planner.
#[derive(Debug, Parser)]
#[command(name = "lp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a weekly plan from a free-form request
    Plan(PlanArgs),
    /// List task proposals stored by previous runs
    Tasks(TasksArgs),
    /// Show recent planning sessions
    History(HistoryArgs),
}
