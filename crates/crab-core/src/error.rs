//! Unified error handling for Crab Core.
//!
//! This module provides a unified error type that wraps configuration, domain
//! and application errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::config::ConfigError;
use crate::domain::DomainError;

/// Root error type for Crab Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrabError {
    /// Errors loading or validating the project configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors from the domain layer (invalid input, templates).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem, external tools).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl CrabError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Template,
    Environment,
    ExternalTool,
    Internal,
}

/// Convenient result type alias.
pub type CrabResult<T> = Result<T, CrabError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_is_transparent() {
        let err: CrabError = DomainError::TemplateNotFound {
            name: "nope".into(),
            root: PathBuf::from("/t"),
        }
        .into();
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn application_categories() {
        let err: CrabError = ApplicationError::EnvironmentExists {
            path: PathBuf::from(".venv"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Environment);

        let err: CrabError = ApplicationError::ExternalToolFailed {
            command: "git init".into(),
            status: Some(128),
            stderr: "fatal: nope\n".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::ExternalTool);
        assert_eq!(err.to_string(), "'git init' failed with exit code 128: fatal: nope");
    }

    #[test]
    fn config_errors_keep_their_category() {
        let err: CrabError = ConfigError::NotFound {
            path: PathBuf::from("missing.toml"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }
}
