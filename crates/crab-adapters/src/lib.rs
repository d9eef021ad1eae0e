//! Infrastructure adapters for Crab.
//!
//! This crate implements the ports defined in `crab-core::application::ports`.
//! It contains all external dependencies and I/O operations: the Tera
//! template engine, the filesystem, and the `uv`/`git` subprocesses.

pub mod filesystem;
pub mod process;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::ProcessRunner;
pub use renderer::TeraRenderer;
pub use template_store::{BUNDLED_TEMPLATES_DIR, LocalTemplateStore};
