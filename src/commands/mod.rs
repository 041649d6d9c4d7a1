//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `auto-compose` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Options shared by every command live in [`GlobalArgs`]; [`Session`] loads
//! the service catalog they point at.

pub mod dry;
pub mod generate;
pub mod lifecycle;
pub mod list;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use auto_compose::catalog::Catalog;
use auto_compose::compose::{self, ComposePlan};
use auto_compose::defaults::COMPOSE_BINARY;
use auto_compose::path::PathContext;
use auto_compose::substitute::{Substituter, Variables};
use auto_compose::suggestions;
use clap::Args;

/// Options accepted by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project name passed to docker-compose (defaults to the fragments' stackName)
    #[arg(short, long, global = true, value_name = "NAME", env = "AUTO_COMPOSE_PROJECT")]
    pub project: Option<String>,

    /// Orchestration binary to run
    #[arg(long, global = true, value_name = "BIN", env = "AUTO_COMPOSE_BIN", default_value = COMPOSE_BINARY)]
    pub compose_bin: String,

    /// Root fragment to use instead of searching for docker-compose.auto.yml
    #[arg(short, long, global = true, value_name = "PATH", env = "AUTO_COMPOSE_FILE")]
    pub file: Option<PathBuf>,

    /// Argument passed to docker-compose before `-f -` (repeatable)
    #[arg(
        short = 'P',
        long = "project-arg",
        global = true,
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub project_args: Vec<String>,
}

/// The service catalog loaded for one invocation
pub struct Session {
    pub ctx: PathContext,
    pub catalog: Catalog,
}

impl Session {
    /// Load the catalog as seen from the current directory and environment.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::open_in(global, &cwd, Variables::from_env())
    }

    /// Load the catalog as seen from `dir` with the given variables.
    pub fn open_in(global: &GlobalArgs, dir: &Path, variables: Variables) -> Result<Self> {
        let ctx = PathContext::new(dir);
        let sub = Substituter::new(variables)?;
        let root_file = global
            .file
            .as_deref()
            .map(|file| ctx.absolutize(&file.to_string_lossy(), ctx.invocation_dir()));

        let catalog = auto_compose::load_catalog(root_file.as_deref(), &ctx, &sub)
            .map_err(|e| suggestions::explain(e, None))?;
        Ok(Self { ctx, catalog })
    }

    /// Build the compose document for the requested service specs.
    pub fn plan<S: AsRef<str>>(&self, specs: &[S]) -> Result<ComposePlan> {
        compose::build(&self.catalog, specs)
            .map_err(|e| suggestions::explain(e, Some(&self.catalog)))
    }
}
