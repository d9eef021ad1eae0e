//! Template Service - template set queries.
//!
//! Backs `crab list` and template resolution. Separated from InitService
//! for single responsibility.

use serde::Serialize;

use crate::{
    application::ports::TemplateStore,
    domain::TemplateSet,
    error::CrabResult,
};

/// Information about a template set for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub files: usize,
    pub path: String,
}

impl From<&TemplateSet> for TemplateInfo {
    fn from(set: &TemplateSet) -> Self {
        Self {
            name: set.name().to_string(),
            files: set.len(),
            path: set.root().display().to_string(),
        }
    }
}

/// Service for template set operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Resolve a template set by name.
    pub fn get(&self, name: &str) -> CrabResult<TemplateSet> {
        self.store.resolve(name)
    }

    /// Describe every available template set, sorted by name.
    pub fn list(&self) -> CrabResult<Vec<TemplateInfo>> {
        self.store
            .list()?
            .iter()
            .map(|name| self.store.resolve(name).map(|set| TemplateInfo::from(&set)))
            .collect()
    }

    /// Directory template sets are looked up in.
    pub fn root(&self) -> &std::path::Path {
        self.store.root()
    }
}
