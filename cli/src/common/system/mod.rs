//! # composectl System Utilities (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host-level checks run before a client is handed out. Currently this is
//! resolving the compose binary: either a bare name looked up on `PATH`, or an
//! explicit path that must point at an executable file.
//!
use crate::core::error::{ComposeError, Result};
use anyhow::anyhow;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// Resolves `tool` to the absolute path of an executable.
///
/// # Errors
///
/// `ComposeError::ToolNotFound` if nothing executable matches.
#[instrument]
pub fn resolve_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            debug!("Resolved '{}' to {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            warn!("Compose tool '{}' not found: {}", tool, e);
            Err(anyhow!(ComposeError::ToolNotFound {
                tool: tool.to_string(),
                reason: e.to_string(),
            }))
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::is_compose_error;

    #[test]
    #[cfg(unix)]
    fn test_resolves_name_on_path() {
        let path = resolve_tool("sh").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolves_explicit_path() {
        let sh = resolve_tool("sh").unwrap();
        assert_eq!(resolve_tool(sh.to_str().unwrap()).unwrap(), sh);
    }

    #[test]
    fn test_unknown_tool_is_tool_not_found() {
        let err = resolve_tool("composectl-no-such-tool-4242").unwrap_err();
        assert!(is_compose_error(&err, |e| matches!(
            e,
            ComposeError::ToolNotFound { tool, .. } if tool == "composectl-no-such-tool-4242"
        )));
    }
}
