//! # composectl Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! The Docker Engine API side of the client. It is read-only: all mutations go
//! through the `docker compose` subprocess instead.
//!
//! - **`connect`**: obtains a `bollard::Docker` handle from the environment.
//! - **`engine`**: the `EngineApi` trait (list containers, networks, volumes,
//!   images) and its `bollard` implementation.
//!

/// Handles establishing a connection to the local Docker daemon.
pub mod connect;
/// The read-only Engine API seam used for project listings.
pub mod engine;

pub use connect::connect_docker;
pub use engine::{EngineApi, Filters};
