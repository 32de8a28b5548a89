//! # composectl Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! Everything needed to run an external command the way the compose client
//! does, independent of compose itself:
//!
//! - **`Invocation`**: program, argument vector and working directory. Pure data;
//!   building one never starts anything.
//! - **`launch_piped`**: spawns with stdin/stdout/stderr pipes, registers the
//!   child with a `ProcessTracker` and returns the `Pipes` straight away.
//! - **`run_direct`**: spawns with discarded streams and waits for the exit status.
//! - **`pipes`** / **`tracker`**: the stream bundle and the counting join.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let tracker = ProcessTracker::new();
//! let inv = Invocation::new("docker", ["compose", "ps"], "/srv/app");
//! let mut pipes = launch_piped(&inv, &tracker)?;
//! println!("{}", pipes.output_string().await);
//! let report = tracker.wait().await;
//! ```
//!
pub mod pipes;
pub mod tracker;

pub use pipes::Pipes;
pub use tracker::{FailedInvocation, ProcessTracker, WaitReport};

use crate::core::error::{ComposeError, Result};
use anyhow::anyhow;
use std::{
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;
use tracing::{debug, error, info, instrument};

/// A fully prepared command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I, current_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: current_dir.into(),
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Spawns `invocation` with all three streams piped and hands the child to
/// `tracker`. Returns as soon as the process has started.
///
/// # Errors
///
/// `ComposeError::Launch` if the process cannot be started. Anything that goes
/// wrong after that shows up on stderr or in the tracker's `WaitReport`.
#[instrument(skip_all, fields(command = %invocation))]
pub fn launch_piped(invocation: &Invocation, tracker: &ProcessTracker) -> Result<Pipes> {
    debug!(
        "Spawning {:?} in {}",
        invocation.args,
        invocation.current_dir.display()
    );
    let mut child = invocation
        .command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| launch_error(invocation, e))?;

    info!("Started '{}' (pid {:?})", invocation, child.id());
    let pipes = Pipes::from_child(&mut child);
    tracker.track(child, invocation.to_string());
    Ok(pipes)
}

/// Runs `invocation` to completion with its streams discarded.
///
/// # Errors
///
/// * `ComposeError::Launch` if the process cannot be started.
/// * `ComposeError::CommandFailed` if it exits unsuccessfully.
#[instrument(skip_all, fields(command = %invocation))]
pub async fn run_direct(invocation: &Invocation) -> Result<()> {
    debug!(
        "Running {:?} in {}",
        invocation.args,
        invocation.current_dir.display()
    );
    let status = invocation
        .command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| launch_error(invocation, e))?;

    if status.success() {
        info!("'{}' completed", invocation);
        Ok(())
    } else {
        error!("'{}' exited with status {}", invocation, status);
        Err(anyhow!(ComposeError::CommandFailed {
            command: invocation.to_string(),
            status,
        }))
    }
}

fn launch_error(invocation: &Invocation, source: std::io::Error) -> anyhow::Error {
    error!("Failed to launch '{}': {}", invocation, source);
    anyhow!(ComposeError::Launch {
        command: invocation.to_string(),
        source,
    })
}
