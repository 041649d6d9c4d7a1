//! List command implementation
//!
//! Shows the stack metadata and every service known from the fragments,
//! with the directory it was declared in and its available options.

use anyhow::Result;
use auto_compose::catalog::Catalog;
use auto_compose::output::OutputConfig;
use clap::Args;
use serde_yaml::Mapping;

use super::{GlobalArgs, Session};

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Dump the whole catalog, configurations and overlays included, as YAML
    #[arg(long)]
    pub yaml: bool,

    /// Print service names only, one per line
    #[arg(short, long, conflicts_with = "yaml")]
    pub quiet: bool,
}

/// Execute the list command
pub fn execute(args: ListArgs, global: &GlobalArgs, output: &OutputConfig) -> Result<()> {
    let session = Session::open(global)?;
    print!("{}", render(&session.catalog, &args, output)?);
    Ok(())
}

fn render(catalog: &Catalog, args: &ListArgs, output: &OutputConfig) -> Result<String> {
    if args.yaml {
        return Ok(serde_yaml::to_string(&catalog.to_yaml())?);
    }
    if args.quiet {
        return Ok(catalog
            .service_names()
            .map(|name| format!("{}\n", name))
            .collect());
    }

    let mut out = String::new();
    if let Some(stack_name) = &catalog.stack_name {
        let version = catalog
            .stack_version
            .as_deref()
            .map(|v| format!(" {}", v))
            .unwrap_or_default();
        out.push_str(&format!("Stack: {}{}\n\n", stack_name, version));
    }

    if catalog.services.is_empty() {
        out.push_str("No services defined.\n");
    }
    for (name, service) in &catalog.services {
        let origin = match &service.path {
            Some(path) => format!("({})", path),
            None => "(options only)".to_string(),
        };
        out.push_str(&format!("{} {}\n", output.heading(name), output.dim(&origin)));
        if !service.options.is_empty() {
            let options: Vec<&str> = service.options.keys().map(String::as_str).collect();
            out.push_str(&format!("  options: {}\n", options.join(", ")));
        }
    }

    for (label, section) in [("Volumes", &catalog.volumes), ("Networks", &catalog.networks)] {
        if !section.is_empty() {
            out.push_str(&format!("\n{}: {}\n", label, names(section).join(", ")));
        }
    }

    Ok(out)
}

fn names(section: &Mapping) -> Vec<String> {
    section
        .keys()
        .map(|key| match key.as_str() {
            Some(name) => name.to_string(),
            None => format!("{:?}", key),
        })
        .collect()
}
