//! # composectl Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy shared by the compose client and the
//! `composectl` binary. Failures fall into two groups:
//!
//! - **Construction failures** (`ToolNotFound`, `ProjectNotFound`,
//!   `EngineUnavailable`, `Config`): the client is never handed out.
//! - **Per-call failures** (`Launch`, `CommandFailed`, `StreamClose`,
//!   `Cancelled`, `DockerApi`): returned to the caller of that one operation.
//!
//! ## Architecture
//!
//! - `ComposeError`: a `thiserror` enum with one variant per failure kind.
//! - `Result<T>`: an alias for `anyhow::Result<T>`. Every function wraps its
//!   `ComposeError` in `anyhow::Error` and adds context on the way up.
//!
//! ## Examples
//!
//! ```rust,ignore
//! match composectl::ComposeClient::connect(dir, &settings, token).await {
//!     Ok(client) => { /* ... */ }
//!     Err(e) if e.downcast_ref::<ComposeError>().is_some_and(|ce| {
//!         matches!(ce, ComposeError::ProjectNotFound { .. })
//!     }) => {
//!         eprintln!("no docker-compose.yml here");
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use std::{io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Custom error type for the compose client.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Compose tool '{tool}' could not be resolved: {reason}")]
    ToolNotFound { tool: String, reason: String },

    #[error("No readable compose file at '{}': {source}", path.display())]
    ProjectNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Docker Engine API is unavailable: {source}")]
    EngineUnavailable {
        #[source]
        source: bollard::errors::Error,
    },

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' exited with status {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Failed to close {} subprocess stream(s): {}", failures.len(), failures.join("; "))]
    StreamClose { failures: Vec<String> },

    #[error("Refusing to launch '{command}': the client context was cancelled")]
    Cancelled { command: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Returns `true` if `err` carries a `ComposeError` matching `pred`.
///
/// Saves callers the `downcast_ref` dance when branching on error kinds.
pub fn is_compose_error(err: &anyhow::Error, pred: impl Fn(&ComposeError) -> bool) -> bool {
    err.downcast_ref::<ComposeError>().is_some_and(pred)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_error_display() {
        let tool = ComposeError::ToolNotFound {
            tool: "docker".into(),
            reason: "cannot find binary path".into(),
        };
        assert_eq!(
            tool.to_string(),
            "Compose tool 'docker' could not be resolved: cannot find binary path"
        );

        let close = ComposeError::StreamClose {
            failures: vec!["stdin: broken pipe".into()],
        };
        assert_eq!(
            close.to_string(),
            "Failed to close 1 subprocess stream(s): stdin: broken pipe"
        );

        let missing = ComposeError::ProjectNotFound {
            path: PathBuf::from("/tmp/app/docker-compose.yml"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        assert!(missing
            .to_string()
            .starts_with("No readable compose file at '/tmp/app/docker-compose.yml'"));
    }

    #[test]
    fn test_is_compose_error_through_context() {
        let err = anyhow!(ComposeError::Cancelled {
            command: "docker compose up -d".into()
        })
        .context("Failed to bring the project up");

        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::Cancelled { .. }
        )));
        assert!(!is_compose_error(&err, |e| matches!(
            e,
            ComposeError::Launch { .. }
        )));
    }
}
