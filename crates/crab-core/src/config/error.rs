//! Configuration loading errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors produced while loading or validating a [`super::CrabConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration document does not exist.
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The document exists but could not be read.
    #[error("Failed to read configuration file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    /// The document is not valid TOML.
    #[error("Failed to parse configuration document{}: {reason}", display_origin(.path))]
    Parse {
        path: Option<PathBuf>,
        reason: String,
    },

    /// The document lacks the tool namespace.
    #[error("Missing [{namespace}] section in {}", origin_or(.path, "pyproject.toml"))]
    MissingSection {
        namespace: &'static str,
        path: Option<PathBuf>,
    },

    /// A present field does not conform to its declared shape or constraints.
    #[error("Invalid configuration value for '{field}': {reason}")]
    Validation { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attach the document path to errors raised while parsing a string.
    pub(crate) fn with_path(self, origin: &std::path::Path) -> Self {
        match self {
            Self::Parse { reason, .. } => Self::Parse {
                path: Some(origin.to_path_buf()),
                reason,
            },
            Self::MissingSection { namespace, .. } => Self::MissingSection {
                namespace,
                path: Some(origin.to_path_buf()),
            },
            other => other,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { path } => vec![
                format!("No file at {}", path.display()),
                "Pass an existing pyproject.toml or crab.toml with --config".into(),
                "Omit --config to use the built-in defaults".into(),
            ],
            Self::Read { path, .. } => vec![
                format!("Check the permissions of {}", path.display()),
            ],
            Self::Parse { .. } => vec![
                "The document must be valid TOML".into(),
                "Check for unbalanced quotes or brackets".into(),
            ],
            Self::MissingSection { namespace, .. } => vec![
                format!("Add a [{namespace}] table to the document"),
                format!("Example:\n    [{namespace}]\n    template = \"basic\""),
            ],
            Self::Validation { field, .. } => vec![
                format!("Fix the value of '{field}'"),
                "Run 'crab config show' to see the expected shape".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Read { .. } => ErrorCategory::Internal,
            Self::Parse { .. } | Self::MissingSection { .. } | Self::Validation { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}

fn display_origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

fn origin_or(path: &Option<PathBuf>, fallback: &str) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string())
}
