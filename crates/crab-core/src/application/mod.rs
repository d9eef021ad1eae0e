//! Application layer for Crab.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (InitService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{InitReport, InitRequest, InitService, InitSteps, TemplateInfo, TemplateService};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Filesystem, RenderReport, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
