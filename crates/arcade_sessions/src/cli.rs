//! Command-line interface for the arcade binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Arcade - single-player mini-games behind a session manager
#[derive(Parser, Debug)]
#[command(name = "arcade")]
#[command(about = "Session manager for chat mini-games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively on stdin/stdout
    Play {
        /// Path to TOML config (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Master seed, overriding the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Owner id attached to sessions started from the console
        #[arg(long, default_value = "console")]
        owner: String,
    },

    /// Run only the staleness sweeper until Ctrl-C
    Daemon {
        /// Path to TOML config (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
