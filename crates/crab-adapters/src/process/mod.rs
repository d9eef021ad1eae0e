//! Subprocess adapter for the `CommandRunner` port.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use crab_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::Invocation,
    error::CrabResult,
};

/// Runs invocations as child processes and waits for them.
///
/// Standard output is captured and logged at debug level; standard error is
/// captured and carried in the error on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %invocation))]
    fn run(&self, invocation: &Invocation) -> CrabResult<()> {
        let mut command = Command::new(invocation.program());
        command
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = invocation.cwd() {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ApplicationError::ToolNotFound {
                program: invocation.program().to_string(),
            },
            _ => ApplicationError::ExternalToolFailed {
                command: invocation.to_string(),
                status: None,
                stderr: e.to_string(),
            },
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(stdout = %stdout.trim_end(), "command output");
        }

        if output.status.success() {
            return Ok(());
        }

        Err(ApplicationError::ExternalToolFailed {
            command: invocation.to_string(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into())
    }
}
