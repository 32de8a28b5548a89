//! # composectl Compose Layer (`compose`)
//!
//! File: cli/src/compose/mod.rs
//!
//! ## Overview
//!
//! The compose-specific half of the crate, built on `common::process` and
//! `common::docker`:
//!
//! - **`names`**: sanitizer for project and service tokens.
//! - **`command`**: `ComposeCommand` and its argument vectors.
//! - **`client`**: `ComposeClient`, construction checks and subcommand dispatch.
//! - **`listing`**: label-scoped Engine API listings and port lookup.
//!
pub mod client;
pub mod command;
pub mod listing;
pub mod names;

#[cfg(test)]
mod testing;

pub use client::{ComposeClient, Dispatch, COMPOSE_FILE};
pub use command::{ComposeCommand, ServiceAction};
pub use listing::{PROJECT_LABEL, SERVICE_LABEL};
pub use names::sanitize;
