//! Variables available to a render.

use std::collections::BTreeMap;

/// Name of the only variable that is substituted in template *paths*.
pub const PROJECT_NAME_VAR: &str = "project_name";

/// Context for template rendering.
///
/// A flat mapping from variable name to value, supplied by the caller for one
/// render. The renderer defines no defaults: a template referencing a name
/// that is not in the context fails to render.
///
/// A `BTreeMap` keeps iteration order stable, which keeps debug output and
/// `crab config` listings deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with `project_name`.
    pub fn for_project(project_name: impl Into<String>) -> Self {
        Self::new().with_variable(PROJECT_NAME_VAR, project_name)
    }

    /// Add a variable, consuming self and returning the extended context.
    ///
    /// ```rust
    /// use crab_core::domain::RenderContext;
    ///
    /// let ctx = RenderContext::for_project("demo").with_variable("author", "Ada");
    /// assert_eq!(ctx.get("author"), Some("Ada"));
    /// ```
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Value of `project_name`, if the caller supplied one.
    pub fn project_name(&self) -> Option<&str> {
        self.get(PROJECT_NAME_VAR)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RenderContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}
