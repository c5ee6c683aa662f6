//! Command-line interface for strictly_simon.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Simon - the memory-sequence game in your terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_simon")]
#[command(about = "Repeat the sequence. Don't slip.", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively
    Play {
        /// Path to the game config file
        #[arg(short, long, default_value = "simon.toml")]
        config: PathBuf,

        /// Seed for the signal sequence (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let a perfect-memory player run on a virtual clock
    Autoplay {
        /// Path to the game config file
        #[arg(short, long, default_value = "simon.toml")]
        config: PathBuf,

        /// Seed for the signal sequence (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of rounds to complete
        #[arg(short, long, default_value = "10")]
        rounds: usize,

        /// Make one deliberate mistake when the sequence reaches this length
        #[arg(long)]
        fail_at: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_defaults() {
        let cli = Cli::try_parse_from(["strictly_simon", "play"]).expect("valid args");
        match cli.command {
            Command::Play { config, seed } => {
                assert_eq!(config, PathBuf::from("simon.toml"));
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_autoplay_args() {
        let cli = Cli::try_parse_from([
            "strictly_simon",
            "autoplay",
            "--rounds",
            "4",
            "--fail-at",
            "2",
            "--seed",
            "9",
            "-v",
        ])
        .expect("valid args");
        match cli.command {
            Command::Autoplay {
                rounds,
                fail_at,
                seed,
                ..
            } => {
                assert_eq!(rounds, 4);
                assert_eq!(fail_at, Some(2));
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(cli.verbose);
    }
}
