//! # composectl
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! A thin client over `docker compose` and the Docker Engine API. Mutating
//! operations run the real `docker compose` binary as a subprocess, with its
//! streams handed back to the caller (piped mode) or awaited (direct mode).
//! Listings go to the Engine API, filtered by the compose project label.
//!
//! ## Architecture
//!
//! - `core`: configuration and the `ComposeError` taxonomy.
//! - `common`: process launch, `Pipes`, `ProcessTracker`, tool resolution and
//!   the `EngineApi` seam over `bollard`.
//! - `compose`: the `ComposeClient` facade, command model and listings.
//!
//! ## Example
//!
//! ```rust,no_run
//! use composectl::{ClientSettings, ComposeClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let settings = ClientSettings::default();
//! let client = ComposeClient::connect("./my-app", &settings, CancellationToken::new())?;
//! if let Some(mut pipes) = client.up().await?.into_pipes() {
//!     println!("{}", pipes.output_string().await);
//! }
//! let report = client.wait().await;
//! println!("{} finished, {} failed", report.completed, report.failures.len());
//! for container in client.ps().await? {
//!     println!("{:?}", container.names);
//! }
//! # Ok(())
//! # }
//! ```
//!
pub mod common;
pub mod compose;
pub mod core;

pub use crate::common::process::{Pipes, ProcessTracker, WaitReport};
pub use crate::compose::{sanitize, ComposeClient, ComposeCommand, Dispatch, ServiceAction};
pub use crate::core::config::{ClientSettings, ExecMode};
pub use crate::core::error::{ComposeError, Result};
