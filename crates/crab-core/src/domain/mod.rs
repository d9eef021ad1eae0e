//! Core domain layer for Crab.
//!
//! Pure values and rules with no I/O:
//!
//! - [`ProjectName`]: validated name of the project directory
//! - [`RenderContext`]: variables handed to the template renderer
//! - [`TemplateSet`] / [`RelativePath`]: what a template set contains, and
//!   [`output_path`] for where each file ends up
//! - [`Invocation`]: an external command to run
//!
//! All I/O (filesystem, processes, template engine) sits behind the ports in
//! `crate::application::ports`.

pub mod error;
pub mod invocation;
pub mod project_name;
pub mod render_context;
pub mod template;

pub use error::{DomainError, ErrorCategory};
pub use invocation::Invocation;
pub use project_name::ProjectName;
pub use render_context::{PROJECT_NAME_VAR, RenderContext};
pub use template::{
    PROJECT_NAME_PLACEHOLDER, RelativePath, TEMPLATE_EXTENSION, TemplateSet, output_path,
};
