//! CLI argument parsing and command dispatch

use anyhow::Result;
use auto_compose::output::OutputConfig;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::commands::GlobalArgs;

/// auto-compose - Merge docker-compose fragments and run docker-compose on them
#[derive(Parser, Debug)]
#[command(name = "auto-compose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available services and their options
    List(commands::list::ListArgs),

    /// Print the merged compose document without running anything
    Dry(commands::dry::DryArgs),

    /// Write the merged compose document to a file
    Generate(commands::generate::GenerateArgs),

    /// Create and start containers
    Up(commands::lifecycle::LifecycleArgs),

    /// Build or rebuild services
    Build(commands::lifecycle::LifecycleArgs),

    /// List containers
    Ps(commands::lifecycle::LifecycleArgs),

    /// View output from containers
    Logs(commands::lifecycle::LifecycleArgs),

    /// Stop and remove containers, networks and volumes
    Down(commands::lifecycle::LifecycleArgs),

    /// Run a one-off command on a service
    Run(commands::lifecycle::RunArgs),
}

impl Cli {
    /// Output configuration derived from `--color` and the environment
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::from_env_and_flag(&self.color)
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .try_init();
        let output = self.output_config();

        match self.command {
            Commands::List(args) => commands::list::execute(args, &self.global, &output),
            Commands::Dry(args) => commands::dry::execute(args, &self.global),
            Commands::Generate(args) => commands::generate::execute(args, &self.global),
            Commands::Up(args) => commands::lifecycle::execute("up", args, &self.global, &output),
            Commands::Build(args) => {
                commands::lifecycle::execute("build", args, &self.global, &output)
            }
            Commands::Ps(args) => commands::lifecycle::execute("ps", args, &self.global, &output),
            Commands::Logs(args) => {
                commands::lifecycle::execute("logs", args, &self.global, &output)
            }
            Commands::Down(args) => {
                commands::lifecycle::execute("down", args, &self.global, &output)
            }
            Commands::Run(args) => commands::lifecycle::execute_run(args, &self.global, &output),
        }
    }
}
