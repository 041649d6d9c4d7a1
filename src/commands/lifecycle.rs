//! Lifecycle command implementations
//!
//! `up`, `build`, `ps`, `logs`, `down` and `run` all merge the requested
//! services and stream the result to docker-compose. They differ only in the
//! docker-compose subcommand and in where service names go on its command
//! line.

use anyhow::Result;
use auto_compose::catalog::Catalog;
use auto_compose::compose::ComposePlan;
use auto_compose::defaults;
use auto_compose::emit::ComposeInvocation;
use auto_compose::output::OutputConfig;
use auto_compose::suggestions;
use clap::Args;

use super::{GlobalArgs, Session};

/// Arguments shared by the lifecycle commands
#[derive(Args, Debug)]
pub struct LifecycleArgs {
    /// Argument passed to the docker-compose subcommand (repeatable), e.g. `-F -d`
    #[arg(short = 'F', long = "flag", value_name = "ARG", allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Service specs such as `web`, `web:debug:-prod`; all services when omitted
    #[arg(value_name = "SERVICE")]
    pub services: Vec<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Argument passed to `docker-compose run` (repeatable), e.g. `-F --rm`
    #[arg(short = 'F', long = "flag", value_name = "ARG", allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Service spec to run
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Command and arguments to run in the container
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Execute `up`, `build`, `ps`, `logs` or `down`
pub fn execute(
    command: &str,
    args: LifecycleArgs,
    global: &GlobalArgs,
    output: &OutputConfig,
) -> Result<()> {
    let session = Session::open(global)?;
    let plan = session.plan(&args.services)?;
    let mut invocation = invocation(command, global, &session.catalog);
    invocation.command_args = args.flags;
    // down always acts on the whole project
    if command != "down" {
        invocation.services = plan.service_names.clone();
    }
    launch(&invocation, &plan, output)
}

/// Execute `run`
pub fn execute_run(args: RunArgs, global: &GlobalArgs, output: &OutputConfig) -> Result<()> {
    let session = Session::open(global)?;
    let plan = session.plan(std::slice::from_ref(&args.service))?;
    let mut invocation = invocation("run", global, &session.catalog);
    invocation.command_args = args.flags;
    invocation.services = plan.service_names.clone();
    invocation.trailing_args = args.command;
    launch(&invocation, &plan, output)
}

fn invocation(command: &str, global: &GlobalArgs, catalog: &Catalog) -> ComposeInvocation {
    let project = defaults::project_name(global.project.as_deref(), catalog.stack_name.as_deref());
    let mut invocation = ComposeInvocation::new(command, project);
    invocation.binary = global.compose_bin.clone();
    invocation.project_args = global.project_args.clone();
    invocation
}

fn launch(invocation: &ComposeInvocation, plan: &ComposePlan, output: &OutputConfig) -> Result<()> {
    eprintln!("{}", output.notice(&invocation.command_line()));
    invocation
        .run(&plan.document)
        .map_err(|e| suggestions::explain(e, None))
}
