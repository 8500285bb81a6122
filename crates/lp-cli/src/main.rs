use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lp_cli::commands::{history, plan, tasks};
use lp_cli::{Cli, Commands, Config};

/// Load configuration from the default locations plus an optional file.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Plan(args)) => {
            let config = load_config(cli.config.as_deref())?;
            plan::run(&mut io::stdout(), args, &config)?;
        }
        Some(Commands::Tasks(args)) => {
            let config = load_config(cli.config.as_deref())?;
            tasks::run(&mut io::stdout(), args, &config)?;
        }
        Some(Commands::History(args)) => {
            let config = load_config(cli.config.as_deref())?;
            history::run(&mut io::stdout(), args, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
