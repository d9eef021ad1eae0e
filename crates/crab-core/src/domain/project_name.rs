//! Validated project name.

use std::fmt;
use std::path::{Component, Path};

use crate::domain::DomainError;

/// A project name that is safe to use as a single directory name.
///
/// Invariant: non-empty, one path segment, never `.`/`..`, no leading dot,
/// no control characters. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate a user-supplied project name.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let name = raw.into();
        let invalid = |reason: &str| DomainError::InvalidProjectName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }

        if Path::new(&name)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir))
            || name.split(['/', '\\']).any(|seg| seg == "..")
        {
            return Err(invalid("path traversal segments are not allowed"));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }

        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }

        if name.chars().any(char::is_control) {
            return Err(invalid("name cannot contain control characters"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Importable Python package name (`my-app` → `my_app`).
    pub fn package_name(&self) -> String {
        to_snake_case(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "MyApp" | "my_app" |
/// | "my-app" | "my_app" |
/// | "HTTPRequest" | "http_request" |
fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Split a string into words on `_`, `-`, `.`, whitespace, camelCase
/// transitions and acronym boundaries (`HTTPRequest` → `http`, `request`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPRequest" → "HTTP" + "Request"
            if c.is_uppercase()
                && next.is_lowercase()
                && current.chars().last().is_some_and(char::is_uppercase)
            {
                words.push(current.to_lowercase());
                current.clear();
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
