//! Directory-backed template store.
//!
//! A templates root holds one sub-directory per template set. Every regular
//! file below a set's directory is a template file:
//!
//! ```text
//! templates/
//! └── basic/
//!     ├── pyproject.toml.j2
//!     ├── README.md.j2
//!     ├── src/{{ project_name }}/__init__.py.j2
//!     └── docs/.gitkeep
//! ```
//!
//! # Root resolution order
//!
//! 1. An explicit directory (`--templates-dir` or the user settings).
//! 2. `<executable-dir>/templates`, for installed binaries shipped with
//!    their templates.
//! 3. The `templates/` directory of this crate, baked in at compile time.
//!
//! The first candidate that exists wins.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::filesystem::map_io_error;
use crab_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainError, RelativePath, TemplateSet},
    error::CrabResult,
};

/// Templates shipped with this crate.
pub const BUNDLED_TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Template store reading sets from a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalTemplateStore {
    root: PathBuf,
}

impl LocalTemplateStore {
    /// Store rooted at exactly `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the first existing candidate root.
    ///
    /// Falls back to the explicit directory (or the bundled one) when no
    /// candidate exists, so lookups report a meaningful path.
    #[instrument(skip_all)]
    pub fn discover(explicit: Option<&Path>) -> Self {
        let candidates = candidate_roots(explicit);
        for candidate in &candidates {
            debug!(path = %candidate.display(), "checking candidate templates root");
            if candidate.is_dir() {
                return Self::new(candidate.clone());
            }
        }

        let fallback = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(BUNDLED_TEMPLATES_DIR));
        warn!(path = %fallback.display(), "no templates root found");
        Self::new(fallback)
    }

    fn set_dir(&self, name: &str) -> Option<PathBuf> {
        // Names are a single path segment.
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        valid.then(|| self.root.join(name)).filter(|dir| dir.is_dir())
    }

    fn not_found(&self, name: &str) -> DomainError {
        DomainError::TemplateNotFound {
            name: name.to_string(),
            root: self.root.clone(),
        }
    }
}

/// Ordered candidate roots, highest priority first.
pub fn candidate_roots(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);

    if let Some(dir) = explicit {
        paths.push(dir.to_path_buf());
    }

    if let Some(exe_sibling) = exe_sibling_templates() {
        paths.push(exe_sibling);
    }

    paths.push(PathBuf::from(BUNDLED_TEMPLATES_DIR));
    paths
}

/// `<directory of current executable>/templates`, if the executable path is
/// known.
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

impl TemplateStore for LocalTemplateStore {
    fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn resolve(&self, name: &str) -> CrabResult<TemplateSet> {
        let dir = self.set_dir(name).ok_or_else(|| self.not_found(name))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().unwrap_or(&dir).to_path_buf(),
                reason: format!("directory walk error: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&dir)
                .map_err(|_| ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("not below {}", dir.display()),
                })?;
            files.push(RelativePath::try_new(rel)?);
        }

        debug!(files = files.len(), "template set resolved");
        Ok(TemplateSet::new(name, dir, files))
    }

    fn list(&self) -> CrabResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.root.display(), "templates root does not exist");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ApplicationError::FilesystemError {
                    path: self.root.clone(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_source(&self, set: &TemplateSet, file: &RelativePath) -> CrabResult<String> {
        let source = set.source_path(file);
        std::fs::read_to_string(&source).map_err(|e| map_io_error(&source, e, "read template"))
    }
}
