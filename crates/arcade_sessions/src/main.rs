//! Arcade - interactive console and sweep daemon.

use anyhow::Result;
use arcade_sessions::cli::{Cli, Command};
use arcade_sessions::{ArcadeConfig, Console, ConsoleCommand, SessionManager, Sweeper};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, seed, owner } => run_console(config, seed, owner).await,
        Command::Daemon { config } => run_daemon(config).await,
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ArcadeConfig> {
    match path {
        Some(path) => Ok(ArcadeConfig::from_file(path)?),
        None => Ok(ArcadeConfig::default()),
    }
}

/// Run the interactive console
#[instrument]
async fn run_console(config: Option<PathBuf>, seed: Option<u64>, owner: String) -> Result<()> {
    let config = load_config(config)?.with_seed(seed);
    let manager = SessionManager::from_config(&config);
    let sweeper = Sweeper::spawn(manager.clone(), config.session_ttl(), config.sweep_interval());
    let console = Console::new(manager, owner, config.session_ttl());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout.write_all(b"arcade ready, type `help`\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match ConsoleCommand::parse(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(command) => match console.execute(command) {
                Ok(reply) => reply,
                Err(e) => format!("error: {}", e),
            },
            Err(e) => format!("error: {}", e),
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    let evicted = sweeper.shutdown().await;
    info!(evicted, "Console closed");
    Ok(())
}

/// Run the sweeper until Ctrl-C
#[instrument]
async fn run_daemon(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let manager = SessionManager::from_config(&config);
    let sweeper = Sweeper::spawn(manager, config.session_ttl(), config.sweep_interval());
    info!(
        ttl_secs = config.session_ttl_secs(),
        interval_secs = config.sweep_interval_secs(),
        "Sweep daemon running, Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
    }
    let evicted = sweeper.shutdown().await;
    info!(evicted, "Daemon stopped");
    Ok(())
}
