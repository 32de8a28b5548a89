//! # Interactive Handlers
//!
//! File: cli/src/commands/interact.rs
//!
//! `composectl logs`, `exec` and `run`. These are the subcommands whose
//! output the user usually watches live; `exec` and `run` can also forward the
//! terminal's stdin into the compose subprocess with `-i`.
//!
//! ```bash
//! composectl logs -f api
//! composectl exec web -- ls -la /srv
//! echo 'select 1;' | composectl run -i db -- psql -U postgres
//! ```
//!
use super::stream::finish;
use anyhow::Context;
use clap::Args;
use composectl::{ComposeClient, Result};
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// Service name; omit for every service.
    pub service: Option<String>,

    /// Keep streaming new log output.
    #[arg(short, long)]
    pub follow: bool,
}

/// A service plus the command to run in it.
#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// Target service.
    pub service: String,

    /// Forward this terminal's stdin to the command.
    #[arg(short, long)]
    pub interactive: bool,

    /// Command and arguments, passed through verbatim (use `--` first).
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

pub async fn handle_logs(client: &ComposeClient, args: LogsArgs) -> Result<()> {
    debug!("Logs args: {:?}", args);
    let dispatch = match (args.service.as_deref(), args.follow) {
        (Some(s), false) => client.logs(s).await,
        (Some(s), true) => client.logs_stream(s).await,
        (None, false) => client.logs_all().await,
        (None, true) => client.logs_all_stream().await,
    }
    .context("Failed to run compose logs")?;
    finish(client, dispatch, false).await
}

pub async fn handle_exec(client: &ComposeClient, args: PayloadArgs) -> Result<()> {
    info!("Executing {:?} in service '{}'", args.command, args.service);
    let dispatch = client
        .exec(&args.service, args.command.as_slice())
        .await
        .with_context(|| format!("Failed to exec in service '{}'", args.service))?;
    finish(client, dispatch, args.interactive).await
}

pub async fn handle_run(client: &ComposeClient, args: PayloadArgs) -> Result<()> {
    info!("Running {:?} in a new '{}' container", args.command, args.service);
    let dispatch = client
        .run(&args.service, args.command.as_slice())
        .await
        .with_context(|| format!("Failed to run in service '{}'", args.service))?;
    finish(client, dispatch, args.interactive).await
}
