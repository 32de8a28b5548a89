//! # composectl Docker Connection Helper
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! Provides `connect_docker`, the single place where a `bollard::Docker`
//! handle is obtained from the ambient environment. `DOCKER_HOST` picks the
//! transport (`unix://`, `tcp://`, `http://`, `npipe://`); without it the
//! platform's default socket or named pipe is used.
//!
//! For HTTP transports the handle is configured without contacting the
//! daemon, so an unreachable daemon surfaces on the first listing call as
//! `ComposeError::DockerApi`. The unix socket transport checks up front that
//! the socket file exists.
//!
use crate::core::error::{ComposeError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tracing::instrument;

/// Establishes a connection handle to the local Docker daemon.
///
/// # Errors
///
/// Returns an `Err` wrapping `ComposeError::EngineUnavailable` if `bollard`
/// cannot build a client from the environment (a malformed `DOCKER_HOST`, or
/// no socket at the default unix path).
#[instrument]
pub fn connect_docker() -> Result<Docker> {
    Docker::connect_with_defaults()
        .map_err(|e| anyhow!(ComposeError::EngineUnavailable { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Requires a reachable Docker daemon. Run locally with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_connect_docker_success() {
        let docker = connect_docker().expect("handle should be configurable");
        assert!(docker.ping().await.is_ok(), "Docker daemon should answer ping");
    }
}
