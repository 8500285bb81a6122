//! CLI subcommand implementations.

pub mod history;
pub mod plan;
pub mod tasks;
