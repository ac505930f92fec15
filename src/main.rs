//! Framecat CLI
//!
//! Concatenates media files without re-encoding, keeping every output
//! track's timestamps continuous across file boundaries.
//!
//! # Usage
//!
//! ```bash
//! framecat list segments/ --ext ts -o list.txt
//! framecat concat list.txt joined.mp4
//! framecat concat list.txt joined.mkv --tracks video --json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use framecat::cli::{commands, Cli, Commands};
use framecat::utils::logging::init_logging;

/// Main entry point for the Framecat CLI
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::build_config(&cli)?;
    init_logging(&config.log)?;

    match &cli.command {
        Commands::Concat(args) => {
            info!("Executing concat command");
            commands::concat(args, &config)?;
        }
        Commands::List(args) => {
            info!("Executing list command");
            commands::list(args)?;
        }
    }

    Ok(())
}
