//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the external
//! collaborators (filesystem, `uv`, `git`), not domain rule violations.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The environment directory is already there.
    #[error("Environment directory already exists: {}", .path.display())]
    EnvironmentExists { path: PathBuf },

    /// Dependency installation needs an environment to install into.
    #[error("No environment at {}", .path.display())]
    MissingEnvironment { path: PathBuf },

    /// The external program could not be started.
    #[error("'{program}' is not installed or not on PATH")]
    ToolNotFound { program: String },

    /// The external program ran and reported failure.
    #[error("'{command}' failed{}{}", exit_suffix(.status), stderr_suffix(.stderr))]
    ExternalToolFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::EnvironmentExists { path } => vec![
                format!("Remove {} or reuse it without --venv", path.display()),
            ],
            Self::MissingEnvironment { .. } => vec![
                "Create the environment in the same run: crab init <name> --venv --install".into(),
            ],
            Self::ToolNotFound { program } => vec![
                format!("Install '{program}' and make sure it is on your PATH"),
                match program.as_str() {
                    "uv" => "See https://docs.astral.sh/uv/ for installation".into(),
                    "git" => "See https://git-scm.com/downloads".into(),
                    _ => "Check the command output above for details".into(),
                },
            ],
            Self::ExternalToolFailed { .. } => vec![
                "Check the command output above for details".into(),
                "Files rendered before the failure were left in place".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::EnvironmentExists { .. } | Self::MissingEnvironment { .. } => {
                ErrorCategory::Environment
            }
            Self::ToolNotFound { .. } | Self::ExternalToolFailed { .. } => {
                ErrorCategory::ExternalTool
            }
        }
    }
}

fn exit_suffix(status: &Option<i32>) -> String {
    status
        .map(|code| format!(" with exit code {code}"))
        .unwrap_or_default()
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
