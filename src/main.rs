//! # auto-compose CLI
//!
//! This is the binary entry point for the `auto-compose` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Printing top-level errors and translating them into an exit code. When
//!   `docker-compose` itself fails, its exit code is passed through.
//!
//! The merge engine lives in the `lib.rs` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use auto_compose::error::Error;
use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let output = cli.output_config();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", output.error(&format!("error: {:#}", err)));
            exit_code(&err)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(Error::ComposeExit {
            code: Some(code), ..
        }) => u8::try_from(*code)
            .ok()
            .filter(|code| *code != 0)
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE),
        _ => ExitCode::FAILURE,
    }
}
