// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they cross the port boundary by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Template '{name}' not found in {}", .root.display())]
    TemplateNotFound { name: String, root: PathBuf },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    #[error("Template '{template}' references undefined variable '{variable}'")]
    UndefinedVariable { template: String, variable: String },

    #[error("Failed to render template '{template}': {reason}")]
    RenderFailed { template: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { .. } => vec![
                "Use letters, digits, '-', '_' and '.'".into(),
                "Path segments such as '..' or '/' are not allowed".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::TemplateNotFound { root, .. } => vec![
                format!("Templates are looked up in {}", root.display()),
                "List available templates: crab list".into(),
                "Point --templates-dir at a directory of template sets".into(),
            ],
            Self::UndefinedVariable { variable, .. } => vec![
                format!("The template expects a value for '{variable}'"),
                "Check the template for typos in {{ ... }} placeholders".into(),
            ],
            Self::RenderFailed { template, .. } => vec![
                format!("Check the syntax of '{template}'"),
            ],
            Self::AbsolutePathNotAllowed { .. } => {
                vec!["Template files must live inside the template directory".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::AbsolutePathNotAllowed { .. } => {
                ErrorCategory::Validation
            }
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::UndefinedVariable { .. } | Self::RenderFailed { .. } => ErrorCategory::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Template,
}
