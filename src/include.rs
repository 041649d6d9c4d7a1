//! Recursive include resolution
//!
//! Starting from the marker file, every fragment is loaded and folded into a
//! single [`Aggregate`], then each entry of its `includes` list is resolved
//! relative to the fragment's own directory and processed the same way
//! (depth-first, in list order).
//!
//! Merge rules:
//!
//! - services are keyed by name; a later definition replaces an earlier one
//!   and a warning is logged;
//! - `volumes` and `networks` are deep-merged, the later fragment winning on
//!   conflicting values;
//! - `stackName`/`stackVersion` come from the first fragment declaring a
//!   `stackName`.
//!
//! A fragment that is already being processed higher up the include chain is
//! rejected as a cycle. Including the same file from two unrelated branches
//! is allowed; it simply contributes its services twice.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_yaml::Mapping;

use crate::error::{Error, Result};
use crate::fragment::{load_fragment, ServiceDefinition};
use crate::merge::{merge_mappings, ArrayMergeMode};
use crate::path::PathContext;
use crate::substitute::Substituter;

/// Union of every fragment reachable from the root fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Services by name, including `base:option` overlay entries
    pub services: IndexMap<String, ServiceDefinition>,
    pub volumes: Mapping,
    pub networks: Mapping,
    pub stack_name: Option<String>,
    pub stack_version: Option<String>,
}

/// Load `root_file` and everything it includes into a new [`Aggregate`].
pub fn resolve(root_file: &Path, ctx: &PathContext, sub: &Substituter) -> Result<Aggregate> {
    let mut aggregate = Aggregate::default();
    let root = ctx.absolutize(&root_file.to_string_lossy(), ctx.invocation_dir());
    merge_fragment(&root, ctx, sub, &mut aggregate, &mut Vec::new())?;
    Ok(aggregate)
}

/// Load the fragment at `file` (absolute) into `aggregate`, then recurse
/// into its includes.
///
/// `chain` holds the fragments currently being processed, outermost first.
pub fn merge_fragment(
    file: &Path,
    ctx: &PathContext,
    sub: &Substituter,
    aggregate: &mut Aggregate,
    chain: &mut Vec<PathBuf>,
) -> Result<()> {
    if chain.iter().any(|seen| seen == file) {
        let cycle = chain
            .iter()
            .chain(std::iter::once(&file.to_path_buf()))
            .map(|p| ctx.display_dir(p))
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(Error::IncludeCycle { cycle });
    }

    debug!("Loading fragment {}", file.display());
    let fragment = load_fragment(file, ctx, sub)?;

    for (name, service) in fragment.services {
        if aggregate.services.contains_key(&name) {
            warn!(
                "Service definition {} already exists, replacing it with the one from {}",
                name,
                file.display()
            );
        }
        aggregate.services.insert(name, service);
    }

    if aggregate.stack_name.is_none() {
        aggregate.stack_name = fragment.stack_name;
        aggregate.stack_version = fragment.stack_version;
    }

    merge_mappings(
        &mut aggregate.volumes,
        &fragment.volumes,
        ArrayMergeMode::Replace,
        "volumes",
    );
    merge_mappings(
        &mut aggregate.networks,
        &fragment.networks,
        ArrayMergeMode::Replace,
        "networks",
    );

    chain.push(file.to_path_buf());
    for include in &fragment.includes {
        let included = ctx.absolutize(include, &fragment.dir);
        debug!("{} includes {}", file.display(), included.display());
        merge_fragment(&included, ctx, sub, aggregate, chain)?;
    }
    chain.pop();

    Ok(())
}
