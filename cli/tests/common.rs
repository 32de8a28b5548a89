//! # composectl Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `composectl` binary against a throwaway project directory,
//! with a stand-in compose binary (`echo`, `true`, `false`) so no Docker
//! daemon is needed for the subprocess paths. `DOCKER_HOST` points at a TCP
//! endpoint, which `bollard` configures without connecting, so client
//! construction works on hosts without a Docker socket.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::{fs, path::Path};
use tempfile::TempDir;

/// Engine endpoint the tests point `DOCKER_HOST` at. Nothing listens there.
pub const UNUSED_DOCKER_HOST: &str = "tcp://127.0.0.1:2375";

/// `composectl` with user configuration isolated under `config_home`.
pub fn composectl_cmd(config_home: &Path) -> Command {
    let mut cmd =
        Command::cargo_bin("composectl").expect("Failed to find composectl binary for testing");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("DOCKER_HOST", UNUSED_DOCKER_HOST)
        .env_remove("COMPOSECTL_BIN")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp dir holding `<name>/docker-compose.yml`, plus the project path.
pub fn project_with_compose_file(name: &str) -> (TempDir, std::path::PathBuf) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let dir = root.path().join(name);
    fs::create_dir_all(&dir).expect("Failed to create project dir");
    fs::write(dir.join("docker-compose.yml"), "services: {}\n")
        .expect("Failed to write compose file");
    (root, dir)
}
