//! Tera-backed template renderer.
//!
//! Content is rendered with strict-undefined semantics: a template that
//! references a variable missing from the [`RenderContext`] fails with
//! [`DomainError::UndefinedVariable`] and nothing is written for that file.
//! That includes names Tera itself would read as false, such as the
//! condition of an `{% if %}` (see [`super::unbound`]).
//! Autoescaping is off and trailing newlines are kept as written.

use std::error::Error as StdError;
use std::path::Path;

use tera::Tera;
use tracing::{debug, info, instrument};

use crab_core::{
    application::ports::{Filesystem, RenderReport, TemplateRenderer, TemplateStore},
    domain::{DomainError, RelativePath, RenderContext, TemplateSet, output_path},
    error::CrabResult,
};

use super::unbound::first_unbound;
use crate::filesystem::LocalFilesystem;

/// Renders one named template set.
pub struct TeraRenderer {
    store: Box<dyn TemplateStore>,
    set: TemplateSet,
    filesystem: Box<dyn Filesystem>,
}

impl std::fmt::Debug for TeraRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraRenderer")
            .field("set", &self.set.name())
            .field("root", &self.store.root())
            .finish()
    }
}

impl TeraRenderer {
    /// Renderer for `name`, writing to the local filesystem.
    ///
    /// Fails with [`DomainError::TemplateNotFound`] if the store has no set
    /// called `name`.
    pub fn new(store: Box<dyn TemplateStore>, name: &str) -> CrabResult<Self> {
        Self::with_filesystem(store, name, Box::new(LocalFilesystem::new()))
    }

    /// Renderer for `name`, writing through `filesystem`.
    pub fn with_filesystem(
        store: Box<dyn TemplateStore>,
        name: &str,
        filesystem: Box<dyn Filesystem>,
    ) -> CrabResult<Self> {
        let set = store.resolve(name)?;
        debug!(template = name, files = set.len(), "renderer ready");
        Ok(Self {
            store,
            set,
            filesystem,
        })
    }

    fn render_file(
        &self,
        set: &TemplateSet,
        file: &RelativePath,
        context: &RenderContext,
        tera_context: &tera::Context,
    ) -> CrabResult<String> {
        let raw = self.store.read_source(set, file)?;

        let name = file.as_str();
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(name, &raw)
            .map_err(|e| translate_error(name, &e))?;

        let template = tera
            .get_template(name)
            .map_err(|e| translate_error(name, &e))?;
        if let Some(variable) = first_unbound(&template.ast, &|var: &str| context.contains(var)) {
            return Err(DomainError::UndefinedVariable {
                template: name.to_string(),
                variable,
            }
            .into());
        }

        tera.render(name, tera_context)
            .map_err(|e| translate_error(name, &e).into())
    }
}

impl TemplateRenderer for TeraRenderer {
    fn template_set(&self) -> &TemplateSet {
        &self.set
    }

    #[instrument(skip_all, fields(template = %self.set.name(), target = %target_dir.display()))]
    fn render(&self, target_dir: &Path, context: &RenderContext) -> CrabResult<RenderReport> {
        self.filesystem.create_dir_all(target_dir)?;

        // Walk again so files added since construction are picked up.
        let set = self.store.resolve(self.set.name())?;

        let mut tera_context = tera::Context::new();
        for (key, value) in context.iter() {
            tera_context.insert(key, value);
        }

        let mut report = RenderReport::new(target_dir);
        for file in set.files() {
            let rendered = self.render_file(&set, file, context, &tera_context)?;
            let destination = output_path(file, context)?.to_path(target_dir);

            self.filesystem.write_file(&destination, &rendered)?;
            debug!(from = %file, to = %destination.display(), "rendered");
            report.files.push(destination);
        }

        info!(files = report.file_count(), "template set rendered");
        Ok(report)
    }
}

/// Map a Tera error onto the domain error for `template`.
///
/// Tera nests the interesting message (`Variable `x` not found in context
/// while rendering ...`) inside a generic "Failed to render" wrapper.
fn translate_error(template: &str, err: &tera::Error) -> DomainError {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        messages.push(inner.to_string());
        source = inner.source();
    }

    if let Some(variable) = messages.iter().find_map(|m| undefined_variable(m)) {
        return DomainError::UndefinedVariable {
            template: template.to_string(),
            variable,
        };
    }

    DomainError::RenderFailed {
        template: template.to_string(),
        reason: messages.join(": "),
    }
}

fn undefined_variable(message: &str) -> Option<String> {
    if !message.contains("not found in context") {
        return None;
    }
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}
