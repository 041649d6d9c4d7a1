//! Dry command implementation
//!
//! Prints the merged compose document to stdout instead of handing it to
//! docker-compose.

use anyhow::Result;
use clap::Args;

use super::{GlobalArgs, Session};

/// Arguments for the dry command
#[derive(Args, Debug)]
pub struct DryArgs {
    /// Service specs such as `web`, `web:debug:-prod`; all services when omitted
    #[arg(value_name = "SERVICE")]
    pub services: Vec<String>,
}

/// Execute the dry command
pub fn execute(args: DryArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let plan = session.plan(&args.services)?;
    print!("{}", plan.document.to_yaml()?);
    Ok(())
}
