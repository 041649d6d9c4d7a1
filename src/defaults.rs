//! Default values for auto-compose.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Name of the fragment file anchoring the upward directory search.
pub const MARKER_FILE: &str = "docker-compose.auto.yml";

/// Orchestration binary invoked by lifecycle commands.
///
/// Can be overridden by the `--compose-bin` CLI flag or the
/// `AUTO_COMPOSE_BIN` environment variable.
pub const COMPOSE_BINARY: &str = "docker-compose";

/// Compose file format version written into generated documents.
pub const COMPOSE_FILE_VERSION: &str = "2.4";

/// Project name used when neither `--project` nor a fragment `stackName`
/// provides one.
pub const PROJECT_NAME: &str = "auto-compose";

/// Returns the project name to pass to the orchestration binary.
///
/// An explicit name wins over the aggregate's `stackName`, which wins over
/// [`PROJECT_NAME`].
pub fn project_name(explicit: Option<&str>, stack_name: Option<&str>) -> String {
    explicit
        .filter(|name| !name.trim().is_empty())
        .or(stack_name.filter(|name| !name.trim().is_empty()))
        .unwrap_or(PROJECT_NAME)
        .trim()
        .to_string()
}
