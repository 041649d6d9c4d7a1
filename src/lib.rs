//! # auto-compose Library
//!
//! This library merges `docker-compose` fragments spread over a project tree
//! into a single compose document. It powers the `auto-compose` command-line
//! tool, which then hands the document to `docker-compose` on standard input.
//!
//! ## Quick Example
//!
//! ```
//! use auto_compose::catalog::Catalog;
//! use auto_compose::compose;
//! use auto_compose::fragment::ServiceDefinition;
//! use auto_compose::include::Aggregate;
//!
//! let mut aggregate = Aggregate::default();
//! aggregate.services.insert(
//!     "web".to_string(),
//!     ServiceDefinition {
//!         path: ".".to_string(),
//!         config: serde_yaml::from_str("image: nginx\nenvironment: [A=1]").unwrap(),
//!     },
//! );
//! aggregate.services.insert(
//!     "web:debug".to_string(),
//!     ServiceDefinition {
//!         path: ".".to_string(),
//!         config: serde_yaml::from_str("environment: [DEBUG=1]").unwrap(),
//!     },
//! );
//!
//! let catalog = Catalog::from_aggregate(aggregate);
//! let plan = compose::build(&catalog, &["web:debug"]).unwrap();
//! assert_eq!(plan.service_names, vec!["web"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Fragments (`fragment`)**: `docker-compose.auto.yml`-style files with
//!   `services`, `volumes`, `networks`, `includes` and stack metadata. Paths
//!   are rewritten (`path`) and `%{NAME}` tokens substituted (`substitute`)
//!   while loading.
//! - **Aggregate (`include`)**: the union of every fragment reachable from the
//!   root marker file (`locator`).
//! - **Catalog (`catalog`)**: services with their `service:option` overlays
//!   folded in.
//! - **Composition (`compose`, `merge`)**: requested `service[:option]...`
//!   specs turned into a compose document.
//! - **Emission (`emit`)**: the document written to a file or piped to
//!   `docker-compose`.
//!
//! ## Execution Flow
//!
//! [`load_catalog`] runs the first steps; the CLI then builds and emits:
//!
//! 1.  **Locate** the nearest marker file.
//! 2.  **Resolve** includes into an aggregate.
//! 3.  **Fold** overlays into a catalog.
//! 4.  **Build** the compose document for the requested services.
//! 5.  **Emit** it.

pub mod catalog;
pub mod compose;
pub mod defaults;
pub mod emit;
pub mod error;
pub mod fragment;
pub mod include;
pub mod locator;
pub mod merge;
pub mod output;
pub mod path;
pub mod substitute;
pub mod suggestions;

#[cfg(test)]
mod compose_proptest;

use std::path::Path;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::path::PathContext;
use crate::substitute::Substituter;

/// Locate the root fragment (unless `root_file` is given), resolve its
/// includes and fold overlays into a [`Catalog`].
pub fn load_catalog(
    root_file: Option<&Path>,
    ctx: &PathContext,
    sub: &Substituter,
) -> Result<Catalog> {
    let root = match root_file {
        Some(file) => file.to_path_buf(),
        None => locator::find_marker(ctx.invocation_dir())?,
    };
    let aggregate = include::resolve(&root, ctx, sub)?;
    Ok(Catalog::from_aggregate(aggregate))
}
