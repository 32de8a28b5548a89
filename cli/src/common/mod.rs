//! # composectl Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks that know nothing about compose subcommands:
//!
//! - **`docker`**: Engine API connection and the read-only `EngineApi` seam.
//! - **`process`**: subprocess launch, the `Pipes` stream bundle and the
//!   `ProcessTracker` counting join.
//! - **`system`**: host checks such as resolving the compose binary.
//!
//! The compose-specific layer (`crate::compose`) is built on top of these.
//!

/// Docker Engine API access via `bollard`.
pub mod docker;
/// Launching and tracking external processes.
pub mod process;
/// Host-level checks (tool resolution).
pub mod system;
