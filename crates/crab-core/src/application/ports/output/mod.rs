//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `crab-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Invocation, RelativePath, RenderContext, TemplateSet};
use crate::error::CrabResult;

/// Port for filesystem operations on the generated project.
///
/// Implemented by:
/// - `crab_adapters::filesystem::LocalFilesystem` (production)
/// - `crab_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CrabResult<()>;

    /// Write UTF-8 content to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> CrabResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for locating template sets by name.
pub trait TemplateStore: Send + Sync {
    /// Directory the store resolves names against.
    fn root(&self) -> &Path;

    /// Resolve a template set name to its files.
    ///
    /// Fails with `DomainError::TemplateNotFound` for unknown names.
    fn resolve(&self, name: &str) -> CrabResult<TemplateSet>;

    /// Names of all available template sets, sorted.
    fn list(&self) -> CrabResult<Vec<String>>;

    /// Raw source of one file of `set`.
    fn read_source(&self, set: &TemplateSet, file: &RelativePath) -> CrabResult<String>;
}

/// Port for rendering one template set into a directory.
pub trait TemplateRenderer {
    /// The template set this renderer was constructed for.
    fn template_set(&self) -> &TemplateSet;

    /// Render every file of the set into `target_dir`.
    ///
    /// Existing files not produced by the set are left alone. A failing
    /// file stops the render; files already written stay on disk.
    fn render(&self, target_dir: &Path, context: &RenderContext) -> CrabResult<RenderReport>;
}

/// Port for running external programs (`uv`, `git`).
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run to completion. Non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> CrabResult<()>;
}

/// What a render call wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub target_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl RenderReport {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            files: Vec::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
