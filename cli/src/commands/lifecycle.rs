//! # Project Lifecycle Handlers
//!
//! File: cli/src/commands/lifecycle.rs
//!
//! Handlers for `composectl up`, `down`, `config` and every service action
//! (`start`, `stop`, `build`, `kill`, ...). Each one dispatches a single
//! compose subcommand, relays its output and fails if the subprocess did.
//!
use super::stream::finish;
use anyhow::Context;
use composectl::{ComposeClient, Result, ServiceAction};
use tracing::info;

pub async fn handle_up(client: &ComposeClient) -> Result<()> {
    info!("Bringing up project '{}'", client.project_name());
    let dispatch = client.up().await.context("Failed to run compose up")?;
    finish(client, dispatch, false).await
}

pub async fn handle_down(client: &ComposeClient) -> Result<()> {
    info!("Taking down project '{}'", client.project_name());
    let dispatch = client.down().await.context("Failed to run compose down")?;
    finish(client, dispatch, false).await
}

pub async fn handle_config(client: &ComposeClient) -> Result<()> {
    let dispatch = client.config().await.context("Failed to run compose config")?;
    finish(client, dispatch, false).await
}

/// Runs `action` for one service, or all of them when `service` is `None`.
pub async fn handle_service_action(
    client: &ComposeClient,
    action: ServiceAction,
    service: Option<&str>,
) -> Result<()> {
    info!(
        "Running '{}' for {} in project '{}'",
        action,
        service.map_or_else(|| "all services".to_string(), |s| format!("service '{}'", s)),
        client.project_name()
    );
    let dispatch = match (action, service) {
        (ServiceAction::Build, Some(s)) => client.build(s).await,
        (ServiceAction::Build, None) => client.build_all().await,
        (ServiceAction::Create, Some(s)) => client.create(s).await,
        (ServiceAction::Create, None) => client.create_all().await,
        (ServiceAction::Events, Some(s)) => client.events_for(s).await,
        (ServiceAction::Events, None) => client.events().await,
        (ServiceAction::Kill, Some(s)) => client.kill(s).await,
        (ServiceAction::Kill, None) => client.kill_all().await,
        (ServiceAction::Pause, Some(s)) => client.pause(s).await,
        (ServiceAction::Pause, None) => client.pause_all().await,
        (ServiceAction::Pull, Some(s)) => client.pull(s).await,
        (ServiceAction::Pull, None) => client.pull_all().await,
        (ServiceAction::Push, Some(s)) => client.push(s).await,
        (ServiceAction::Push, None) => client.push_all().await,
        (ServiceAction::Restart, Some(s)) => client.restart(s).await,
        (ServiceAction::Restart, None) => client.restart_all().await,
        (ServiceAction::Rm, Some(s)) => client.rm(s).await,
        (ServiceAction::Rm, None) => client.rm_all().await,
        (ServiceAction::Start, Some(s)) => client.start(s).await,
        (ServiceAction::Start, None) => client.start_all().await,
        (ServiceAction::Stop, Some(s)) => client.stop(s).await,
        (ServiceAction::Stop, None) => client.stop_all().await,
        (ServiceAction::Top, Some(s)) => client.top(s).await,
        (ServiceAction::Top, None) => client.top_all().await,
        (ServiceAction::Unpause, Some(s)) => client.unpause(s).await,
        (ServiceAction::Unpause, None) => client.unpause_all().await,
    }
    .with_context(|| format!("Failed to run compose {}", action))?;
    finish(client, dispatch, false).await
}
