//! # composectl Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads the client settings that decide *how* compose is invoked: which
//! binary to run and whether subprocesses are streamed (piped) or awaited
//! (direct).
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line overrides (`--compose-bin`, `--direct`)
//! 2. Project-specific `.composectl.toml` inside the project directory
//! 3. User-specific `<config dir>/composectl/config.toml`
//! 4. Default values defined in the code
//!
//! ```toml
//! [client]
//! binary = "~/bin/docker"
//! mode = "direct"
//! ```
//!
use crate::core::error::{ComposeError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File name of the per-project configuration file.
pub const PROJECT_CONFIG_FILENAME: &str = ".composectl.toml";

/// Binary used when nothing else is configured.
pub const DEFAULT_BINARY: &str = "docker";

/// Resolved configuration: every layer merged and defaults applied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub client: ClientSettings,
}

/// Settings consumed by `ComposeClient` construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Compose binary: a name looked up on PATH or a path (can use ~).
    pub binary: String,
    /// Whether subprocess streams are handed back to the caller.
    pub mode: ExecMode,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            mode: ExecMode::default(),
        }
    }
}

/// One configuration file as written. Unset keys stay `None` so a layer only
/// overrides what it actually names.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub client: FileClientSettings,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileClientSettings {
    pub binary: Option<String>,
    pub mode: Option<ExecMode>,
}

/// How the client runs compose subprocesses.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Spawn, attach stdin/stdout/stderr pipes, return immediately.
    #[default]
    Piped,
    /// Spawn with discarded streams and wait for exit.
    Direct,
}

/// Overrides coming from the command line; `None` keeps the file value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub binary: Option<String>,
    pub mode: Option<ExecMode>,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

/// Loads, merges, expands and validates configuration for `project_dir`.
pub fn load_config(project_dir: &Path, overrides: &Overrides) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(project_dir)?;
    let mut merged = merge_configs(user_config, project_config);
    apply_overrides(&mut merged, overrides);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "composectl", "composectl")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_user_config() -> Result<Option<FileConfig>> {
    match user_config_path() {
        Some(path) if path.is_file() => {
            info!("Loading user configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        Some(path) => {
            debug!("User configuration file not found at {}", path.display());
            Ok(None)
        }
        None => {
            debug!("Could not determine user config directory.");
            Ok(None)
        }
    }
}

fn load_project_config(project_dir: &Path) -> Result<Option<FileConfig>> {
    let path = project_dir.join(PROJECT_CONFIG_FILENAME);
    if path.is_file() {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No {} in {}", PROJECT_CONFIG_FILENAME, project_dir.display());
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project keys win over user keys; whatever neither sets takes the default.
fn merge_configs(user: Option<FileConfig>, project: Option<FileConfig>) -> Config {
    let user = user.unwrap_or_default().client;
    let project = project.unwrap_or_default().client;
    Config {
        client: ClientSettings {
            binary: project
                .binary
                .or(user.binary)
                .unwrap_or_else(default_binary),
            mode: project.mode.or(user.mode).unwrap_or_default(),
        },
    }
}

fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(binary) = &overrides.binary {
        config.client.binary = binary.clone();
    }
    if let Some(mode) = overrides.mode {
        config.client.mode = mode;
    }
}

fn expand_config_paths(config: &mut Config) {
    config.client.binary = shellexpand::tilde(&config.client.binary).into_owned();
    debug!("Expanded compose binary: {}", config.client.binary);
}

fn validate_config(config: &Config) -> Result<()> {
    if config.client.binary.trim().is_empty() {
        return Err(anyhow!(ComposeError::Config(
            "client.binary must not be empty".to_string()
        )));
    }
    Ok(())
}
