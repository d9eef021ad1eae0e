//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "initialize a project" or "list templates".

pub mod init_service;
pub mod template_service;

pub use init_service::{InitReport, InitRequest, InitService, InitSteps};
pub use template_service::{TemplateInfo, TemplateService};
