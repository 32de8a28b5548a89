//! # composectl Command Router
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Defines the `composectl` subcommands and routes each one to its handler:
//!
//! - `lifecycle`: `up`, `down`, `config` and the service actions
//!   (`start`, `stop`, `build`, ...), all streamed through `docker compose`.
//! - `interact`: `logs`, `exec`, `run`.
//! - `inspect`: Engine API listings (`ps`, `networks`, `volumes`, `images`, `port`).
//!
//! Every handler receives a ready `ComposeClient`; building it (config
//! loading, construction checks, Ctrl+C wiring) happens once in `handle`.
//!
use anyhow::Context;
use clap::{Args, Subcommand};
use composectl::{
    core::config::{self, ExecMode, Overrides},
    ComposeClient, Result, ServiceAction,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

mod inspect;
mod interact;
mod lifecycle;
mod stream;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory containing docker-compose.yml.
    #[arg(short, long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Compose binary to run (name on PATH or a path).
    #[arg(long, global = true, env = "COMPOSECTL_BIN")]
    pub compose_bin: Option<String>,

    /// Wait for each compose subprocess instead of streaming its output.
    #[arg(long, global = true)]
    pub direct: bool,
}

/// An optional service target.
#[derive(Args, Debug, Clone)]
pub struct ServiceArg {
    /// Service name; omit to target every service.
    pub service: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and start containers (detached).
    Up,
    /// Stop and remove containers and networks.
    Down,
    /// Print the compose file in canonical form.
    Config,
    /// Build or rebuild service images.
    Build(ServiceArg),
    /// Create service containers without starting them.
    Create(ServiceArg),
    /// Start existing service containers.
    Start(ServiceArg),
    /// Stop running service containers.
    Stop(ServiceArg),
    /// Restart service containers.
    Restart(ServiceArg),
    /// Force-stop service containers.
    Kill(ServiceArg),
    /// Pause service containers.
    Pause(ServiceArg),
    /// Unpause service containers.
    Unpause(ServiceArg),
    /// Remove stopped service containers.
    Rm(ServiceArg),
    /// Show running processes.
    Top(ServiceArg),
    /// Pull service images.
    Pull(ServiceArg),
    /// Push service images.
    Push(ServiceArg),
    /// Stream container events until interrupted.
    Events(ServiceArg),
    /// Show container logs.
    Logs(interact::LogsArgs),
    /// Run a command in a running service container.
    Exec(interact::PayloadArgs),
    /// Run a one-off command in a new service container.
    Run(interact::PayloadArgs),
    /// List project containers.
    Ps(inspect::PsArgs),
    /// List project networks.
    Networks,
    /// List project volumes.
    Volumes,
    /// List images used by project containers.
    Images,
    /// Show published ports of a service.
    Port(inspect::PortArgs),
}

/// Builds the client for `globals` and runs `command` against it.
pub async fn handle(globals: GlobalArgs, command: Commands) -> Result<()> {
    let overrides = Overrides {
        binary: globals.compose_bin.clone(),
        mode: globals.direct.then_some(ExecMode::Direct),
    };
    let cfg = config::load_config(&globals.project_dir, &overrides)
        .context("Failed to load composectl configuration")?;
    debug!("Client settings: {:?}", cfg.client);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted; no further compose processes will be started.");
            on_interrupt.cancel();
        }
    });

    let client = ComposeClient::connect(&globals.project_dir, &cfg.client, cancel)
        .with_context(|| format!("Cannot use project at {}", globals.project_dir.display()))?;

    match command {
        Commands::Up => lifecycle::handle_up(&client).await,
        Commands::Down => lifecycle::handle_down(&client).await,
        Commands::Config => lifecycle::handle_config(&client).await,
        Commands::Build(a) => targeted(&client, ServiceAction::Build, a).await,
        Commands::Create(a) => targeted(&client, ServiceAction::Create, a).await,
        Commands::Start(a) => targeted(&client, ServiceAction::Start, a).await,
        Commands::Stop(a) => targeted(&client, ServiceAction::Stop, a).await,
        Commands::Restart(a) => targeted(&client, ServiceAction::Restart, a).await,
        Commands::Kill(a) => targeted(&client, ServiceAction::Kill, a).await,
        Commands::Pause(a) => targeted(&client, ServiceAction::Pause, a).await,
        Commands::Unpause(a) => targeted(&client, ServiceAction::Unpause, a).await,
        Commands::Rm(a) => targeted(&client, ServiceAction::Rm, a).await,
        Commands::Top(a) => targeted(&client, ServiceAction::Top, a).await,
        Commands::Pull(a) => targeted(&client, ServiceAction::Pull, a).await,
        Commands::Push(a) => targeted(&client, ServiceAction::Push, a).await,
        Commands::Events(a) => targeted(&client, ServiceAction::Events, a).await,
        Commands::Logs(args) => interact::handle_logs(&client, args).await,
        Commands::Exec(args) => interact::handle_exec(&client, args).await,
        Commands::Run(args) => interact::handle_run(&client, args).await,
        Commands::Ps(args) => inspect::handle_ps(&client, args).await,
        Commands::Networks => inspect::handle_networks(&client).await,
        Commands::Volumes => inspect::handle_volumes(&client).await,
        Commands::Images => inspect::handle_images(&client).await,
        Commands::Port(args) => inspect::handle_port(&client, args).await,
    }
}

async fn targeted(client: &ComposeClient, action: ServiceAction, arg: ServiceArg) -> Result<()> {
    lifecycle::handle_service_action(client, action, arg.service.as_deref()).await
}
