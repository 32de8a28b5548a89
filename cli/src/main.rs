//! # composectl Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `composectl` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command router in `commands`
//!
//! All errors propagate to this level, where they are printed once with their
//! full context chain and turned into exit status 1.
//!
//! ## Examples
//!
//! ```bash
//! # Bring a project up, with info-level logging
//! composectl -v -p ./my-app up
//!
//! # Follow one service's logs
//! composectl logs -f web
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "composectl",
    about = "Drive a docker compose project from one place",
    long_about = "Runs docker compose subcommands against a single project directory \
                  and inspects its containers, networks, volumes and images through \
                  the Docker Engine API.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
    #[command(flatten)]
    globals: commands::GlobalArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::handle(cli.globals, cli.command).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
