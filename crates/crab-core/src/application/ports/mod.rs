//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `crab-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template set lookup
//!   - `TemplateRenderer`: Template rendering
//!   - `CommandRunner`: External programs

pub mod output;

pub use output::{CommandRunner, Filesystem, RenderReport, TemplateRenderer, TemplateStore};

#[cfg(test)]
pub use output::MockCommandRunner;
