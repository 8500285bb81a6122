//! Life planner CLI library.
//!
//! This crate provides the CLI interface for the life planner.

mod cli;
pub mod commands;
mod config;
mod generator;
mod memory;
mod pipeline;
mod session_log;

pub use cli::{Cli, Commands};
pub use config::Config;
