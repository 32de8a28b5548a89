//! # composectl Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the client library and the binary:
//! - `config`: layered TOML settings (binary, execution mode)
//! - `error`: the `ComposeError` taxonomy and the crate-wide `Result`
//!
pub mod config;
pub mod error;
