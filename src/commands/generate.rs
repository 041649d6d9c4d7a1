//! Generate command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use auto_compose::emit;
use clap::Args;

use super::{GlobalArgs, Session};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// File to write, relative to the current directory
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Service specs such as `web`, `web:debug:-prod`; all services when omitted
    #[arg(value_name = "SERVICE")]
    pub services: Vec<String>,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let path = generate(&session, &args)?;
    println!("File generated: {}", path.display());
    Ok(())
}

fn generate(session: &Session, args: &GenerateArgs) -> Result<PathBuf> {
    let plan = session.plan(&args.services)?;
    let path = session.ctx.invocation_dir().join(&args.output);
    emit::write_document(&plan.document, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
