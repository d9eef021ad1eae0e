//! Template sets and the path rules applied while rendering them.
//!
//! ```text
//! templates/basic/                      target/
//! ├── pyproject.toml.j2          ──►    ├── pyproject.toml
//! ├── README.md.j2               ──►    ├── README.md
//! └── src/{{ project_name }}/           └── src/demo/
//!     └── __init__.py.j2         ──►        └── __init__.py
//! ```
//!
//! Only the literal `{{ project_name }}` placeholder is substituted in paths.
//! Content placeholders go through the full template engine; paths do not.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::{DomainError, RenderContext, render_context::PROJECT_NAME_VAR};

/// The literal path segment replaced by the project name.
pub const PROJECT_NAME_PLACEHOLDER: &str = "{{ project_name }}";

/// Extension marking a file as a template; stripped from output names.
pub const TEMPLATE_EXTENSION: &str = ".j2";

/// A filesystem path guaranteed to be relative, stored with `/` separators.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let rejected = || DomainError::AbsolutePathNotAllowed {
            path: path.display().to_string(),
        };

        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(seg) => segments.push(seg.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(rejected());
                }
            }
        }

        if segments.is_empty() {
            return Err(rejected());
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Resolve against a base directory.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        self.0.split('/').fold(base.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable, named collection of template files.
///
/// Files are kept sorted so that every walk over the set yields the same
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    name: String,
    root: PathBuf,
    files: Vec<RelativePath>,
}

impl TemplateSet {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, mut files: Vec<RelativePath>) -> Self {
        files.sort();
        files.dedup();
        Self {
            name: name.into(),
            root: root.into(),
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the relative file paths are rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative template paths; restartable, finite, deterministic.
    pub fn files(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Absolute location of a template file on disk.
    pub fn source_path(&self, file: &RelativePath) -> PathBuf {
        file.to_path(&self.root)
    }
}

/// Compute the output path of one template file.
///
/// Replaces every occurrence of [`PROJECT_NAME_PLACEHOLDER`] with the
/// context's `project_name` and strips a trailing [`TEMPLATE_EXTENSION`].
/// Other `{{ … }}` sequences in the path are left untouched.
///
/// # Errors
///
/// [`DomainError::UndefinedVariable`] if the path contains the placeholder
/// but the context has no `project_name`.
pub fn output_path(template: &RelativePath, ctx: &RenderContext) -> Result<RelativePath, DomainError> {
    let mut rendered = template.as_str().to_string();

    if rendered.contains(PROJECT_NAME_PLACEHOLDER) {
        let project_name = ctx
            .project_name()
            .ok_or_else(|| DomainError::UndefinedVariable {
                template: template.to_string(),
                variable: PROJECT_NAME_VAR.into(),
            })?;
        rendered = rendered.replace(PROJECT_NAME_PLACEHOLDER, project_name);
    }

    if let Some(stripped) = rendered.strip_suffix(TEMPLATE_EXTENSION) {
        // `foo/.j2` has no name left to write to.
        if !stripped.is_empty() && !stripped.ends_with('/') {
            rendered = stripped.to_string();
        }
    }

    RelativePath::try_new(rendered)
}
