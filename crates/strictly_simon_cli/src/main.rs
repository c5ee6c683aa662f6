//! Strictly Simon - terminal front end
//!
//! Interactive play and virtual-clock simulations of the memory-sequence game.

#![warn(missing_docs)]

mod autoplay;
mod cli;
mod input;
mod play;
mod terminal;
mod timer;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_simon::SimonConfig;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing(cli.verbose);

    match cli.command {
        Command::Play { config, seed } => {
            let config = load_config(&config, seed)?;
            play::run_play(config).await
        }
        Command::Autoplay {
            config,
            seed,
            rounds,
            fail_at,
        } => {
            let config = load_config(&config, seed)?;
            let report = autoplay::run_autoplay(&config, rounds, fail_at);
            println!("{report}");
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn initialize_tracing(verbose: bool) {
    let default = if verbose {
        "info,strictly_simon=debug,strictly_simon_cli=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

#[instrument(skip(config_path), fields(path = %config_path.display()))]
fn load_config(config_path: &Path, seed_override: Option<u64>) -> Result<SimonConfig> {
    let config = if config_path.exists() {
        SimonConfig::from_file(config_path)?
    } else {
        info!("Config file not found, using defaults");
        SimonConfig::default()
    };

    Ok(config.with_seed(seed_override))
}
