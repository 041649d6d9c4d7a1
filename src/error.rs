//! # Error Handling
//!
//! This module defines the centralized error type for the `auto-compose`
//! library. It uses the `thiserror` library to describe every failure the
//! merge engine and the emitter can run into.
//!
//! The failures fall into a few groups:
//!
//! - **Not found**: no marker file in any ancestor directory, an unknown
//!   service name, or an unknown overlay name for a known service.
//! - **Fragment problems**: a fragment that cannot be parsed, or a chain of
//!   `includes` that loops back onto itself.
//! - **External process**: the orchestration binary could not be started, or
//!   it ran and reported failure through its exit code.
//! - **Wrapped errors** from I/O, YAML, JSON and regex handling.
//!
//! Duplicate service definitions are deliberately absent: they are logged as
//! warnings and the later definition wins.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for auto-compose operations
#[derive(Error, Debug)]
pub enum Error {
    /// No `docker-compose.auto.yml` was found in the start directory or any
    /// of its ancestors.
    #[error("{marker} not found in {} or any parent directory", start.display())]
    MarkerNotFound { marker: String, start: PathBuf },

    /// A requested service is not defined by any fragment.
    #[error("service not found: {service}")]
    ServiceNotFound { service: String },

    /// A requested overlay is not defined for the service.
    #[error("options not found: {option} for service {service}")]
    OptionNotFound { service: String, option: String },

    /// A fragment file could not be read.
    #[error("Failed to read fragment {}: {message}", path.display())]
    FragmentRead { path: PathBuf, message: String },

    /// A fragment could not be parsed.
    #[error("Configuration parsing error in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// A fragment includes itself, directly or through other fragments.
    #[error("Include cycle detected: {cycle}")]
    IncludeCycle { cycle: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// The orchestration binary could not be started.
    #[error("Failed to start {binary}: {message}")]
    ComposeSpawn { binary: String, message: String },

    /// The orchestration binary exited unsuccessfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("{binary} exited with {}", code.map(|c| format!("code {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    ComposeExit { binary: String, code: Option<i32> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
