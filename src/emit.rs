//! Document emission
//!
//! The merged document either lands in a file or is streamed to the standard
//! input of the orchestration binary:
//!
//! ```text
//! <binary> <project-args> -f - -p <project> <command> <command-args> <services> <trailing-args>
//! ```
//!
//! The child's standard output and error are inherited, so the user sees the
//! binary's own output. Only its exit status is interpreted.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::compose::ComposeDocument;
use crate::defaults::COMPOSE_BINARY;
use crate::error::{Error, Result};

/// Write the document as YAML to `path`.
pub fn write_document(document: &ComposeDocument, path: &Path) -> Result<()> {
    let yaml = document.to_yaml()?;
    fs::write(path, yaml)?;
    info!("Wrote compose document to {}", path.display());
    Ok(())
}

/// One run of the orchestration binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub binary: String,
    /// Arguments placed before `-f -`
    pub project_args: Vec<String>,
    pub project_name: String,
    /// Subcommand such as `up` or `run`
    pub command: String,
    /// Arguments of the subcommand, placed before the service names
    pub command_args: Vec<String>,
    pub services: Vec<String>,
    /// Arguments placed after the service names
    pub trailing_args: Vec<String>,
}

impl ComposeInvocation {
    pub fn new(command: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            binary: COMPOSE_BINARY.to_string(),
            project_args: Vec::new(),
            project_name: project_name.into(),
            command: command.into(),
            command_args: Vec::new(),
            services: Vec::new(),
            trailing_args: Vec::new(),
        }
    }

    /// Full argument list, each argument trimmed and empty ones dropped.
    pub fn args(&self) -> Vec<String> {
        let fixed = [
            "-f".to_string(),
            "-".to_string(),
            "-p".to_string(),
            self.project_name.clone(),
            self.command.clone(),
        ];

        self.project_args
            .iter()
            .chain(fixed.iter())
            .chain(self.command_args.iter())
            .chain(self.services.iter())
            .chain(self.trailing_args.iter())
            .map(|arg| arg.trim())
            .filter(|arg| !arg.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The command line as shown to the user.
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary.clone())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawn the binary, pipe `document` as JSON to its standard input and
    /// wait for it to exit.
    pub fn run(&self, document: &ComposeDocument) -> Result<()> {
        let payload = document.to_json()?;
        debug!("Spawning {}", self.command_line());

        let mut child = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::ComposeSpawn {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        // Dropping stdin closes the pipe, signaling end of input.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("{} closed its standard input early", self.binary);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ComposeExit {
                binary: self.binary.clone(),
                code: status.code(),
            })
        }
    }
}
